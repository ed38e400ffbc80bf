//! Authorization Builders
//!
//! One builder per supported action kind (mint, mintTokens, withdraw).
//! Each holds its argument schema as constants, encodes and hashes the
//! arguments through the shared parameter encoder, and signs the digest
//! through the shared typed-domain signer. The literal action-name
//! string is always the first encoded field, so two actions whose
//! remaining arguments happen to encode identically still hash apart.
//!
//! Builders are pure encode-and-sign: a zero or past `expiration` is
//! issued without complaint and rejected by the verifier at check time.

pub mod types;
pub mod mint;
pub mod mint_tokens;
pub mod withdraw;

pub use types::{authorization_schema, digest_payload, verify_token, AuthorizationToken, AUTHORIZATION_TYPE};

use crate::abi::{AbiType, AbiValue};
use crate::error::IssueError;
use crate::hash::Hash;
use crate::logging::{LogEntry, LogLevel, Logger};
use crate::typed_data::{Domain, KeyHandle, TypedDataError, TypedDomainSigner};

/// Construct the protocol signer with the authorization schema registered.
pub fn protocol_signer(domain: Domain) -> Result<TypedDomainSigner, TypedDataError> {
    TypedDomainSigner::new(domain, vec![authorization_schema()])
}

/// Sign a digest and assemble the token. Shared by all builders.
pub(crate) fn issue_signed(
    signer: &TypedDomainSigner,
    key: &dyn KeyHandle,
    action: &'static str,
    digest: Hash,
    arguments: Vec<(AbiType, AbiValue)>,
    expiration: Option<u64>,
    log: &Logger,
) -> Result<AuthorizationToken, IssueError> {
    let signature = signer.sign_typed_data(AUTHORIZATION_TYPE, &digest_payload(&digest), key)?;

    log.emit(
        LogEntry::new(LogLevel::Info, "authorization", "issued authorization")
            .field("action", action)
            .field("digest", digest)
            .field("expiration", expiration.map(|e| e.to_string()).unwrap_or_else(|| "none".to_string())),
    );

    Ok(AuthorizationToken {
        digest,
        signature,
        arguments,
        expiration,
    })
}
