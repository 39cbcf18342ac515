//! Blake2b-256, the digest behind proposal ids, description hashes, decision
//! digests and address checksums.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Digest of the concatenation of `parts`, without building it.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let hasher = parts
        .iter()
        .fold(Blake2b256::new(), |hasher, part| hasher.chain_update(part));
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}
