//! # IPv4 Prefixes
//!
//! Parsing and bit helpers for the single match field the verifier models:
//! the destination IPv4 address.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::errors::PrefixError;

/// Width of the modelled address space in bits.
pub const ADDRESS_BITS: u8 = 32;

/// Parse `a.b.c.d/len` into a normalised prefix.
///
/// Host bits below the mask are cleared, so `10.0.0.7/24` parses to
/// `10.0.0.0/24`.
pub fn parse_prefix(input: &str) -> Result<Ipv4Net, PrefixError> {
    let (addr, len) = input
        .split_once('/')
        .ok_or_else(|| PrefixError::MissingMask(input.to_string()))?;

    let addr: Ipv4Addr = addr
        .parse()
        .map_err(|_| PrefixError::InvalidAddress(addr.to_string()))?;

    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PrefixError::InvalidMaskLength(len.to_string()));
    }
    let len: u8 = len
        .parse()
        .map_err(|_| PrefixError::InvalidMaskLength(len.to_string()))?;

    Ipv4Net::new(addr, len)
        .map(|net| net.trunc())
        .map_err(|_| PrefixError::InvalidMaskLength(len.to_string()))
}

/// Number of wildcarded (don't-care) low bits, `32 - maskLen`.
pub fn wildcard_bits(prefix: &Ipv4Net) -> u8 {
    ADDRESS_BITS - prefix.prefix_len()
}

/// Bit of `addr` at `depth`, counting from the most significant bit.
///
/// `depth` must be below [`ADDRESS_BITS`].
pub fn bit_at(addr: u32, depth: u8) -> usize {
    ((addr >> (ADDRESS_BITS - 1 - depth)) & 1) as usize
}

/// First and last address covered by `prefix`, as integers.
pub fn prefix_bounds(prefix: &Ipv4Net) -> (u32, u32) {
    (
        u32::from(prefix.network()),
        u32::from(prefix.broadcast()),
    )
}
