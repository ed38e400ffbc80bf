//! ticket721 Authorization Core
//!
//! Off-chain issuance of signed authorization tokens for the ticket721
//! smart-contract ticketing platform. A trusted backend approves an
//! action (minting tickets, minting fungible tokens, withdrawing funds)
//! by deterministically encoding the action's arguments, hashing the
//! encoding with keccak-256, and signing the digest under the protocol's
//! typed-data domain. The contract, given the same arguments, recomputes
//! the identical digest and recovers the signer; any byte of divergence
//! between the two encodings is a security failure.
//!
//! # Architecture
//!
//! - **hash**: keccak-256 and the canonical digest format
//! - **address**: 20-byte addresses, EIP-55 checksum output
//! - **abi**: canonical parameter encoding (head/tail word layout)
//! - **typed_data**: EIP-712 style domain-bound signing and recovery
//! - **group**: resource/controller group identifier derivation
//! - **authorization**: one builder per action kind, token verification
//! - **logging**: structured logging with sensitive-data redaction
//!
//! # Example
//!
//! ```rust,ignore
//! use ticket721_auth::{authorization, Address, Domain, LocalKey, Logger, LogLevel};
//!
//! let signer = authorization::protocol_signer(Domain::new(
//!     "ticket721", "1", 1, verifying_contract,
//! ))?;
//! let key = LocalKey::from_hex(authority_key_hex)?;
//! let log = Logger::new(LogLevel::Info);
//!
//! let token = authorization::withdraw::issue(&signer, &key, &args, &log)?;
//! ```
//!
//! # Concurrency
//!
//! Encoding, hashing and recovery are pure and freely parallel. Signing
//! is the one call with an external dependency: the key holder enters as
//! an explicit [`KeyHandle`] capability per call, never as process-wide
//! state.

pub mod error;
pub mod hash;
pub mod address;
pub mod abi;
pub mod typed_data;
pub mod group;
pub mod authorization;
pub mod logging;

// Re-export key types for convenience
pub use error::{AuthorizationError, IssueError, SignError};
pub use hash::{hash, is_valid_hash_format, keccak256, Hash};
pub use address::Address;
pub use abi::{AbiEncoder, AbiType, AbiValue, EncodeError, U256};
pub use typed_data::{
    Domain, FieldDef, KeyHandle, LocalKey, Signature, TypedDataError, TypedDomainSigner,
};
pub use group::derive_group_id;
pub use authorization::{protocol_signer, verify_token, AuthorizationToken};
pub use logging::{LogEntry, LogLevel, Logger};
