//! Ed25519 key pairs for commission members.

use ed25519_dalek::SigningKey;
use qdao_types::{KeyPair, PrivateKey, PublicKey};
use rand::rngs::OsRng;

/// Fresh key pair from the OS random source.
pub fn generate_keypair() -> KeyPair {
    keypair_from_private(PrivateKey(SigningKey::generate(&mut OsRng).to_bytes()))
}

pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    KeyPair {
        public: public_from_private(&private),
        private,
    }
}

/// Deterministic key pair. Fixtures and offline signers use this to reproduce
/// a member's key from a stored seed.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_from_private(PrivateKey(*seed))
}
