//! # SHA-256 Hashing
//!
//! Deterministic content hashing used for transaction hashes, block hashes,
//! and Merkle tree nodes. Pure function, no internal state: the same bytes
//! always produce the same lowercase hex digest, on any host, forever.

use sha2::{Digest, Sha256};

/// Hash data with SHA-256 and return a lowercase hex digest.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Hash the concatenation of several UTF-8 fragments with SHA-256.
///
/// Equivalent to `sha256_hex(fragments.concat().as_bytes())` but avoids the
/// intermediate allocation for the common multi-field case (transaction and
/// block content hashing).
pub fn sha256_hex_concat(fragments: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for fragment in fragments {
        hasher.update(fragment.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let h1 = sha256_hex(b"hello");
        let h2 = sha256_hex(b"hello");
        assert_eq!(h1, h2);
    }

    #[test]
    fn different_inputs_differ() {
        assert_ne!(sha256_hex(b"a"), sha256_hex(b"b"));
    }

    #[test]
    fn is_lowercase_hex_of_expected_length() {
        let digest = sha256_hex(b"");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        // sha256("") is a well known constant.
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn concat_matches_manual_concatenation() {
        let manual = sha256_hex(b"abc");
        let concatenated = sha256_hex_concat(&["a", "b", "c"]);
        assert_eq!(manual, concatenated);
    }
}
