//! MintTokens Authorization
//!
//! Approves minting fungible tokens of a given currency to a recipient
//! within a group.

use super::{issue_signed, AuthorizationToken};
use crate::abi::{AbiEncoder, AbiType, AbiValue, U256};
use crate::address::Address;
use crate::error::IssueError;
use crate::hash::{hash, Hash};
use crate::logging::Logger;
use crate::typed_data::{KeyHandle, TypedDomainSigner};

/// Action tag; first encoded field of every mintTokens digest.
pub const ACTION: &str = "mintTokens";

/// Arguments of a mintTokens authorization
#[derive(Debug, Clone)]
pub struct MintTokensArgs {
    /// Group the mint is scoped to
    pub group_id: Hash,
    /// Token contract being minted
    pub currency: Address,
    /// Amount to mint, full-width
    pub amount: U256,
    /// Account receiving the tokens
    pub recipient: Address,
    /// Issuer-assigned authorization code
    pub code: U256,
    /// Unix-seconds validity bound, checked by the verifier
    pub expiration: u64,
}

/// Ordered argument block:
/// `string "mintTokens", bytes32 groupId, address currency, uint256 amount,
/// address recipient, uint256 code, uint256 expiration`
pub fn argument_block(args: &MintTokensArgs) -> Vec<(AbiType, AbiValue)> {
    vec![
        (AbiType::String, AbiValue::String(ACTION.to_string())),
        (AbiType::FixedBytes(32), AbiValue::FixedBytes(args.group_id.as_bytes().to_vec())),
        (AbiType::Address, AbiValue::Address(args.currency)),
        (AbiType::Uint(256), AbiValue::Uint(args.amount)),
        (AbiType::Address, AbiValue::Address(args.recipient)),
        (AbiType::Uint(256), AbiValue::Uint(args.code)),
        (AbiType::Uint(256), AbiValue::Uint(U256::from(args.expiration))),
    ]
}

/// Canonical digest of the full argument schema.
pub fn encode_and_hash(args: &MintTokensArgs) -> Hash {
    let block = argument_block(args);
    let (types, values): (Vec<AbiType>, Vec<AbiValue>) = block.into_iter().unzip();
    hash(&AbiEncoder::encode(&types, &values).expect("static argument types match values"))
}

/// Full-argument idempotency key. Off-chain dedup bookkeeping only.
///
/// The amount field is tagged `uint25`: that is the tag historically
/// written to dedup stores for this action, and existing keys must keep
/// matching. The binary encoding above is unaffected.
pub fn args_format(args: &MintTokensArgs) -> String {
    format!(
        "string_{}_bytes32_{}_address_{}_uint25_{}_address_{}_uint256_{}_uint256_{}",
        ACTION, args.group_id, args.currency, args.amount, args.recipient, args.code, args.expiration
    )
}

/// Stable action/recipient key used to look up prior issuance.
pub fn selector_format(args: &MintTokensArgs) -> String {
    format!("string_{}_bytes32_{}_address_{}", ACTION, args.group_id, args.recipient)
}

/// Code-only key.
pub fn codes_format(code: &U256) -> String {
    format!("uint256_{}", code)
}

/// Encode, hash and sign a mintTokens authorization.
pub fn issue(
    signer: &TypedDomainSigner,
    key: &dyn KeyHandle,
    args: &MintTokensArgs,
    log: &Logger,
) -> Result<AuthorizationToken, IssueError> {
    let digest = encode_and_hash(args);
    issue_signed(
        signer,
        key,
        ACTION,
        digest,
        argument_block(args),
        Some(args.expiration),
        log,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::{protocol_signer, verify_token};
    use crate::typed_data::{Domain, LocalKey};

    fn test_args() -> MintTokensArgs {
        MintTokensArgs {
            group_id: hash(b"group"),
            currency: Address::parse("0x0618A298E7a1d15d251fb2a00056E4db74869d8A").unwrap(),
            amount: U256::from_dec("500000000000000000000").unwrap(),
            recipient: Address::parse("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826").unwrap(),
            code: U256::from(7),
            expiration: 1_893_456_000,
        }
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(encode_and_hash(&test_args()), encode_and_hash(&test_args()));
    }

    #[test]
    fn test_args_format_keeps_historical_amount_tag() {
        let key = args_format(&test_args());
        assert!(key.contains("_uint25_500000000000000000000_"));
        assert!(!key.contains("_uint256_500000000000000000000_"));
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = protocol_signer(Domain::new(
            "ticket721",
            "1",
            1,
            Address::parse("0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC").unwrap(),
        ))
        .unwrap();
        let key = LocalKey::from_hex("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318").unwrap();
        let log = Logger::new(crate::logging::LogLevel::Error);

        let token = issue(&signer, &key, &test_args(), &log).unwrap();
        verify_token(&signer, &token, &key.address(), 1_700_000_000).unwrap();
    }
}
