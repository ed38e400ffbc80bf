//! Ethereum Address Handling
//!
//! 20-byte account/contract addresses. Parsing is case-insensitive;
//! output is always EIP-55 checksummed, the one convention applied
//! everywhere in this crate.

use crate::hash::keccak256;
use std::fmt;

/// A 20-byte Ethereum address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address([u8; 20]);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Parse an untrusted candidate string.
    ///
    /// Accepts exactly 40 hex characters, optionally `0x`-prefixed,
    /// case-insensitive. Returns `None` on any other input.
    pub fn parse(candidate: &str) -> Option<Address> {
        let body = candidate
            .strip_prefix("0x")
            .or_else(|| candidate.strip_prefix("0X"))
            .unwrap_or(candidate);
        if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let bytes = hex::decode(body).ok()?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Some(Address(out))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 checksummed form.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak256(lower.as_bytes());

        let mut result = String::with_capacity(42);
        result.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let byte = digest[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

            if ch.is_ascii_digit() || nibble < 8 {
                result.push(ch);
            } else {
                result.push(ch.to_ascii_uppercase());
            }
        }

        result
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}
