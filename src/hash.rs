//! Keccak-256 Hash Primitive
//!
//! The single digest type used throughout the authorization pipeline.
//! Every hash that crosses a module boundary is a [`Hash`]: 32 bytes,
//! rendered as `0x` + 64 lowercase hex characters (66 total). Inputs in
//! any accepted spelling (bare, prefixed, mixed case) collapse to this
//! one canonical form before storage or comparison.

use std::fmt;
use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// A 32-byte keccak-256 digest in canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }

    /// Parse an untrusted candidate string into canonical form.
    ///
    /// Returns `None` when the candidate is not exactly 64 hex characters
    /// (optionally `0x`-prefixed). Callers probing external input branch on
    /// the `Option` rather than handling an error type.
    pub fn normalize(candidate: &str) -> Option<Hash> {
        if !is_valid_hash_format(candidate) {
            return None;
        }
        let body = strip_hex_prefix(candidate);
        let bytes = hex::decode(body).ok()?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Some(Hash(out))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Canonical textual form: `0x` + 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Hash arbitrary bytes into a canonical digest.
pub fn hash(data: &[u8]) -> Hash {
    Hash(keccak256(data))
}

/// Check whether a candidate string is a well-formed digest.
///
/// Accepts exactly 64 hex characters, optionally prefixed with `0x`,
/// case-insensitive. Any other length or any non-hex character fails.
pub fn is_valid_hash_format(candidate: &str) -> bool {
    let body = strip_hex_prefix(candidate);
    body.len() == 64 && body.bytes().all(|b| b.is_ascii_hexdigit())
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_vectors() {
        // Empty string
        let h = keccak256(b"");
        assert_eq!(
            hex::encode(h),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );

        // "hello"
        let h = keccak256(b"hello");
        assert_eq!(
            hex::encode(h),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_hash_protocol_tag() {
        assert_eq!(
            hash(b"ticket721").to_hex(),
            "0xd8283ec13b28c9220077721a2c20aaae180a38c82ac58da608be0527f26d7ab6"
        );
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash(b"abc"), hash(b"abc"));
        assert_ne!(hash(b"abc"), hash(b"abd"));
    }

    #[test]
    fn test_format_validation() {
        let bare = "d8283ec13b28c9220077721a2c20aaae180a38c82ac58da608be0527f26d7ab6";
        assert!(is_valid_hash_format(bare));
        assert!(is_valid_hash_format(&format!("0x{}", bare)));
        assert!(is_valid_hash_format(&bare.to_uppercase()));

        assert!(!is_valid_hash_format(""));
        assert!(!is_valid_hash_format("0x"));
        assert!(!is_valid_hash_format(&bare[1..]));
        assert!(!is_valid_hash_format(&format!("{}0", bare)));
        assert!(!is_valid_hash_format(&"+".repeat(128)));
        assert!(!is_valid_hash_format(&format!("0x{}", "g".repeat(64))));
    }

    #[test]
    fn test_normalize_canonicalizes() {
        let bare = "D8283EC13B28C9220077721A2C20AAAE180A38C82AC58DA608BE0527F26D7AB6";
        let prefixed = format!("0x{}", bare);
        let lower = bare.to_lowercase();

        let a = Hash::normalize(bare).unwrap();
        let b = Hash::normalize(&prefixed).unwrap();
        let c = Hash::normalize(&lower).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(
            a.to_hex(),
            "0xd8283ec13b28c9220077721a2c20aaae180a38c82ac58da608be0527f26d7ab6"
        );
    }

    #[test]
    fn test_normalize_rejects() {
        assert!(Hash::normalize("").is_none());
        assert!(Hash::normalize("0x1234").is_none());
        assert!(Hash::normalize(&"+".repeat(128)).is_none());
        assert!(Hash::normalize(&"a".repeat(63)).is_none());
        assert!(Hash::normalize(&"a".repeat(65)).is_none());
    }
}
