//! Cryptographic primitives for the QDAO governor.
//!
//! - **Ed25519** for commission member signatures over decision digests
//! - **Blake2b** for proposal ids, description hashes and decision digests
//! - Address derivation with `qdao_` prefix and base32 encoding

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{decode_address, derive_address, validate_address};
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
