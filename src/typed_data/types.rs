//! Typed-Data Definitions
//!
//! Core structures for EIP-712 style structured-data signing: the
//! signing domain, struct schemas, and the recoverable signature format.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A field in a struct schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDef {
    /// The name of the field
    pub name: String,
    /// The type of the field (e.g., "address", "uint256", "bytes32")
    #[serde(rename = "type")]
    pub type_name: String,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// The signing domain binding signatures to one protocol deployment.
///
/// All four fields are required and must match the constants compiled
/// into the verifying contract exactly; a signature produced under one
/// domain never validates under another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Human-readable protocol name
    pub name: String,
    /// Major protocol version
    pub version: String,
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Contract that will verify signatures under this domain
    pub verifying_contract: Address,
}

impl Domain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }
}

/// Recoverable ECDSA signature components
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct Signature {
    /// r component (32 bytes)
    pub r: [u8; 32],
    /// s component (32 bytes)
    pub s: [u8; 32],
    /// v component (recovery id, typically 27 or 28)
    pub v: u8,
}

impl Signature {
    /// Create from raw components
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    /// Create from 65-byte signature (r || s || v)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypedDataError> {
        if bytes.len() != 65 {
            return Err(TypedDataError::InvalidSignature("expected 65 bytes".to_string()));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        let v = bytes[64];

        Ok(Self { r, s, v })
    }

    /// Parse from a hex string (with or without 0x prefix)
    pub fn from_hex(candidate: &str) -> Result<Self, TypedDataError> {
        let body = candidate
            .strip_prefix("0x")
            .or_else(|| candidate.strip_prefix("0X"))
            .unwrap_or(candidate);
        let bytes = hex::decode(body)
            .map_err(|e| TypedDataError::InvalidSignature(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Convert to 65-byte representation (r || s || v)
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

/// Errors from schema registration and typed-data hashing
///
/// All of these indicate a defect at the call site (unknown struct name,
/// a payload that does not match its registered schema); they fail fast
/// rather than being retried.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypedDataError {
    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    #[error("conflicting schema registration for type: {0}")]
    SchemaConflict(String),

    #[error("invalid type: {0}")]
    InvalidType(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid value for type {type_name}: {value}")]
    InvalidValue { type_name: String, value: String },

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}
