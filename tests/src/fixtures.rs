//! Shared builders for the suite and the benchmarks.

use rand::Rng;
use shared_types::{NodeId, Rule};
use vf_01_verification::{parse_topology, NetworkState};

/// Parse an id, panicking on invalid input.
pub fn id(s: &str) -> NodeId {
    NodeId::new(s).expect("valid node id")
}

/// Parse a rule, panicking on invalid input.
pub fn rule(s: &str) -> Rule {
    s.parse().expect("valid rule")
}

/// Build a network from topology text.
pub fn network(topology: &str) -> NetworkState {
    parse_topology(topology)
        .expect("valid topology")
        .build()
        .expect("consistent topology")
}

/// Three fully meshed switches with one host each. The host on S3 is named
/// by an address.
pub const MESH_TOPOLOGY: &str = "\
Mesh
S1:S2,S3
S2:S1,S3
S3:S1,S2
H
H1:S1
H2:S2
10.0.0.1:S3
R
";

/// Next hops valid in [`MESH_TOPOLOGY`].
pub const MESH_NEXT_HOPS: [&str; 6] = ["S1", "S2", "S3", "H1", "H2", "10.0.0.1"];

/// A ring of `switches` switches, each with one host, and no rules.
pub fn ring_topology(switches: usize) -> String {
    let mut text = String::from("Ring\n");
    for i in 0..switches {
        let next = (i + 1) % switches;
        text.push_str(&format!("S{i}:S{next}\n"));
    }
    text.push_str("H\n");
    for i in 0..switches {
        text.push_str(&format!("H{i}:S{i}\n"));
    }
    text.push_str("R\n");
    text
}

/// Random rules for a ring built by [`ring_topology`]: each forwards a /16
/// to /24 under 10.0.0.0/8 either to the next switch or to the local host.
pub fn random_ring_rules<R: Rng>(rng: &mut R, switches: usize, count: usize) -> Vec<Rule> {
    (0..count)
        .map(|_| {
            let i = rng.gen_range(0..switches);
            let len = rng.gen_range(16..=24u8);
            let addr = u32::from_be_bytes([10, rng.gen(), rng.gen(), 0]);
            let mask = u32::MAX << (32 - u32::from(len));
            let net = std::net::Ipv4Addr::from(addr & mask);
            let next_hop = if rng.gen_bool(0.5) {
                format!("S{}", (i + 1) % switches)
            } else {
                format!("H{i}")
            };
            rule(&format!("S{i}-{net}/{len}-{next_hop}"))
        })
        .collect()
}
