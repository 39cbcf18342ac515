//! Commission member identities derived from Ed25519 public keys.
//!
//! Layout: `qdao_` + 52 base32 chars of key + 8 base32 chars of checksum,
//! 65 characters in total. The checksum is the first 5 bytes of
//! Blake2b-256(public_key).

use qdao_types::{PublicKey, WalletAddress};

const PREFIX: &str = WalletAddress::PREFIX;
const KEY_CHARS: usize = 52;
const CHECKSUM_LEN: usize = 5;
const CHECKSUM_CHARS: usize = 8;

/// Base32 without padding over an alphabet that drops `0 2 l v`.
mod base32 {
    const ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

    fn digit(c: u8) -> Option<u8> {
        ALPHABET.iter().position(|&a| a == c).map(|p| p as u8)
    }

    /// Most significant bit first; the final group is zero-padded on the right.
    pub fn encode(bytes: &[u8]) -> String {
        let bits = bytes.len() * 8;
        (0..bits.div_ceil(5))
            .map(|group| {
                let value = (0..5).fold(0u8, |acc, offset| {
                    let bit = group * 5 + offset;
                    let set = bit < bits && bytes[bit / 8] & (0x80 >> (bit % 8)) != 0;
                    (acc << 1) | u8::from(set)
                });
                ALPHABET[value as usize] as char
            })
            .collect()
    }

    /// Fills `out` from `s`; trailing pad bits are ignored.
    pub fn decode_into(s: &str, out: &mut [u8]) -> Option<()> {
        if s.len() != (out.len() * 8).div_ceil(5) {
            return None;
        }
        out.fill(0);
        let bits = out.len() * 8;
        for (group, c) in s.bytes().enumerate() {
            let value = digit(c)?;
            for offset in 0..5 {
                let bit = group * 5 + offset;
                if bit < bits && value & (0x10 >> offset) != 0 {
                    out[bit / 8] |= 0x80 >> (bit % 8);
                }
            }
        }
        Some(())
    }
}

fn checksum(key: &[u8; 32]) -> [u8; CHECKSUM_LEN] {
    let mut sum = [0u8; CHECKSUM_LEN];
    sum.copy_from_slice(&crate::blake2b_256(key)[..CHECKSUM_LEN]);
    sum
}

/// The identity a member signs under.
pub fn derive_address(public_key: &PublicKey) -> WalletAddress {
    let key = public_key.as_bytes();
    WalletAddress::new(format!(
        "{PREFIX}{}{}",
        base32::encode(key),
        base32::encode(&checksum(key))
    ))
}

/// Recover the public key bytes of a key-derived address.
///
/// `None` for contract-style identities, bad characters or a checksum mismatch.
pub fn decode_address(address: &str) -> Option<[u8; 32]> {
    let body = address.strip_prefix(PREFIX)?;
    if body.len() != KEY_CHARS + CHECKSUM_CHARS || !body.is_ascii() {
        return None;
    }
    let (key_part, sum_part) = body.split_at(KEY_CHARS);

    let mut key = [0u8; 32];
    base32::decode_into(key_part, &mut key)?;
    let mut sum = [0u8; CHECKSUM_LEN];
    base32::decode_into(sum_part, &mut sum)?;

    (sum == checksum(&key)).then_some(key)
}

pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_some()
}
