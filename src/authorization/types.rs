//! Authorization Token and Verification
//!
//! The output artifact of every builder and the defensive off-chain
//! verification path. The consuming contract remains the final
//! authority; verification here exists so an issuer can validate its own
//! artifacts (or a peer's) before anything touches the chain.

use crate::abi::{AbiEncoder, AbiType, AbiValue};
use crate::address::Address;
use crate::error::AuthorizationError;
use crate::hash::{hash, Hash};
use crate::typed_data::{FieldDef, Signature, TypedDomainSigner};

/// Struct name every authorization digest is signed under.
pub const AUTHORIZATION_TYPE: &str = "Authorization";

/// Schema registered with the protocol signer for authorization digests.
pub fn authorization_schema() -> (String, Vec<FieldDef>) {
    (
        AUTHORIZATION_TYPE.to_string(),
        vec![FieldDef::new("digest", "bytes32")],
    )
}

/// Typed payload wrapping a digest for signing.
pub fn digest_payload(digest: &Hash) -> serde_json::Value {
    serde_json::json!({ "digest": digest.to_hex() })
}

/// A signed authorization: proof that the authority approved one
/// specific action. Immutable once produced; consumed exactly once by
/// the contract's own nonce/group bookkeeping.
#[derive(Debug, Clone)]
pub struct AuthorizationToken {
    /// keccak-256 over the canonical argument encoding
    pub digest: Hash,
    /// Recoverable signature over the typed-data root of the digest
    pub signature: Signature,
    /// The ordered argument block the digest commits to
    pub arguments: Vec<(AbiType, AbiValue)>,
    /// Unix-seconds validity bound, when the action carries one
    pub expiration: Option<u64>,
}

impl AuthorizationToken {
    /// Wall-clock expiry check. Expiration is the sole cancellation
    /// mechanism; there are no revocation lists.
    pub fn is_expired(&self, now: u64) -> bool {
        match self.expiration {
            Some(expiration) => now > expiration,
            None => false,
        }
    }
}

/// Defensively verify a token against the expected authority.
///
/// Checks, in order: expiration against `now`, that the argument block
/// still hashes to the token's digest, and that the recovered signer is
/// the expected authority. Each rejection class is reported distinctly.
pub fn verify_token(
    signer: &TypedDomainSigner,
    token: &AuthorizationToken,
    authority: &Address,
    now: u64,
) -> Result<(), AuthorizationError> {
    if let Some(expiration) = token.expiration {
        if now > expiration {
            return Err(AuthorizationError::Expired {
                expired_at: expiration,
                now,
            });
        }
    }

    let (types, values): (Vec<AbiType>, Vec<AbiValue>) = token.arguments.iter().cloned().unzip();
    let encoded = AbiEncoder::encode(&types, &values)?;
    let computed = hash(&encoded);
    if computed != token.digest {
        return Err(AuthorizationError::DigestMismatch {
            computed: computed.to_hex(),
            claimed: token.digest.to_hex(),
        });
    }

    signer.verify_signer(
        AUTHORIZATION_TYPE,
        &digest_payload(&token.digest),
        &token.signature,
        authority,
    )
}
