//! Fundamental types for the QDAO governor.
//!
//! This crate defines the value types shared across every other crate in the workspace:
//! wallet addresses, proposal identifiers, decision digests, block heights and key material.

pub mod address;
pub mod block;
pub mod error;
pub mod hash;
pub mod keys;

pub use address::WalletAddress;
pub use block::BlockHeight;
pub use error::TypesError;
pub use hash::{DecisionDigest, ProposalId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
