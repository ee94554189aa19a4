//! Hashing primitives for OrderChain
//!
//! Every digest in the ledger is SHA-256. Transaction, Merkle and block
//! hashes all flow through the helpers here so the byte layouts stay in one
//! place.

use sha2::{Digest, Sha256};

/// Raw 32-byte SHA-256 digest.
pub type Sha256Hash = [u8; 32];

/// Hash an arbitrary byte slice.
pub fn sha256(data: &[u8]) -> Sha256Hash {
    Sha256::digest(data).into()
}

/// Hash the concatenation `left || right` of two digests.
pub fn hash_pair(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Convert a digest to a lowercase hex string for display.
pub fn hash_to_hex(hash: &Sha256Hash) -> String {
    hex::encode(hash)
}

/// Number of leading `'0'` characters in the hex rendering of `hash`.
pub fn leading_zero_nibbles(hash: &Sha256Hash) -> u32 {
    let mut count = 0;
    for byte in hash {
        if *byte == 0 {
            count += 2;
            continue;
        }
        if *byte < 0x10 {
            count += 1;
        }
        break;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero_nibbles() {
        let mut h = [0u8; 32];
        assert_eq!(leading_zero_nibbles(&h), 64);
        h[0] = 0x0f;
        assert_eq!(leading_zero_nibbles(&h), 1);
        h[0] = 0x10;
        assert_eq!(leading_zero_nibbles(&h), 0);
        h = [0u8; 32];
        h[1] = 0x01;
        assert_eq!(leading_zero_nibbles(&h), 3);
        h[1] = 0xa0;
        assert_eq!(leading_zero_nibbles(&h), 2);
    }

    #[test]
    fn test_nibbles_match_hex_rendering() {
        let hash = sha256(b"orderchain");
        let hex = hash_to_hex(&hash);
        let expected = hex.chars().take_while(|c| *c == '0').count() as u32;
        assert_eq!(leading_zero_nibbles(&hash), expected);
    }

    #[test]
    fn test_hex_rendering() {
        let hash = sha256(b"abc");
        assert_eq!(
            hash_to_hex(&hash),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_to_hex(&[0u8; 32]), "0".repeat(64));
    }
}
