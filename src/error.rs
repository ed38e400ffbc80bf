//! Error Taxonomy
//!
//! Failures fall into four buckets that must never blur into each other:
//!
//! - Format errors (malformed hash or address strings) are `Option`
//!   sentinels at the parse sites, not error types; untrusted input is
//!   a branch, not an exception.
//! - Schema and encoding errors ([`crate::typed_data::TypedDataError`],
//!   [`crate::abi::EncodeError`]) are coding defects and fail fast.
//! - Authorization errors ([`AuthorizationError`]) are security-relevant
//!   rejections carrying structured context for audit logs.
//! - Signing-infrastructure errors ([`SignError`]) may be retried.
//!
//! No variant ever carries private-key material or raw signing inputs.

use crate::abi::EncodeError;
use crate::typed_data::TypedDataError;
use thiserror::Error;

/// Failures of the signing backend
#[derive(Debug, Clone, Error)]
pub enum SignError {
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("signing backend unavailable: {0}")]
    Unavailable(String),

    #[error("signing timed out after {0}ms")]
    Timeout(u64),

    #[error("signing failed: {0}")]
    Failed(String),
}

impl SignError {
    /// Whether issuance may be retried with the same parameters.
    ///
    /// A retried issuance reuses the same idempotency key; it must never
    /// re-sign different parameters under that key.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SignError::Unavailable(_) | SignError::Timeout(_))
    }
}

/// Failures while issuing an authorization token
#[derive(Debug, Clone, Error)]
pub enum IssueError {
    #[error(transparent)]
    TypedData(#[from] TypedDataError),

    #[error(transparent)]
    Signer(#[from] SignError),
}

impl IssueError {
    pub fn is_retryable(&self) -> bool {
        match self {
            IssueError::Signer(e) => e.is_retryable(),
            IssueError::TypedData(_) => false,
        }
    }
}

/// Security-relevant rejections during verification
#[derive(Debug, Clone, Error)]
pub enum AuthorizationError {
    #[error("recovered signer {recovered} does not match expected authority {expected}")]
    UnauthorizedSigner { expected: String, recovered: String },

    #[error("authorization expired at {expired_at} (checked at {now})")]
    Expired { expired_at: u64, now: u64 },

    #[error("argument digest {computed} does not match token digest {claimed}")]
    DigestMismatch { computed: String, claimed: String },

    #[error(transparent)]
    TypedData(#[from] TypedDataError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}
