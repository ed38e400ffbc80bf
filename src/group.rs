//! Group Identifier Derivation
//!
//! Authorizations are namespaced to one `(resource, controller)` pair so
//! a token valid for resource A's controller contract cannot be replayed
//! against resource B's, even if resource identifiers collide.

use crate::abi::{AbiEncoder, AbiType, AbiValue};
use crate::address::Address;
use crate::hash::{hash, Hash};

/// Derive the identifier scoping authorizations for one resource to its
/// controller contract.
///
/// The resource id (a UUID string) is lowercased before encoding, so the
/// result is identical regardless of how either input was capitalized.
/// Pure function, no side effects.
pub fn derive_group_id(resource_id: &str, controller: &Address) -> Hash {
    let resource = resource_id.to_lowercase();

    let encoded = AbiEncoder::encode(
        &[AbiType::Address, AbiType::String],
        &[AbiValue::Address(*controller), AbiValue::String(resource)],
    )
    .expect("static argument types match values");

    hash(&encoded)
}
