//! Typed-Domain Signing
//!
//! EIP-712 style structured-data hashing and signing, bound to one
//! protocol domain (name, version, chain id, verifying contract).
//! Struct schemas are registered once at construction; the off-chain
//! issuer and the on-chain verifier must agree on them byte for byte.
//!
//! # Reference
//! - <https://eips.ethereum.org/EIPS/eip-712>

pub mod types;
pub mod encoder;
pub mod hasher;
pub mod signer;

pub use types::*;
pub use encoder::{encode_type, type_hash, SchemaTable};
pub use hasher::{domain_separator, hash_struct, typed_data_root};
pub use signer::{recover_address, KeyHandle, LocalKey, TypedDomainSigner};
