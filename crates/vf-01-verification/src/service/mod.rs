//! Service Layer
//!
//! Serialises mutations and their re-verification behind one lock.

mod verifier_service;

pub use verifier_service::VerifierService;
