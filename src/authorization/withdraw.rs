//! Withdraw Authorization
//!
//! Approves moving funds held by a group's controller contract out to a
//! target account.

use super::{issue_signed, AuthorizationToken};
use crate::abi::{AbiEncoder, AbiType, AbiValue, U256};
use crate::address::Address;
use crate::error::IssueError;
use crate::hash::{hash, Hash};
use crate::logging::Logger;
use crate::typed_data::{KeyHandle, TypedDomainSigner};

/// Action tag; first encoded field of every withdraw digest.
pub const ACTION: &str = "withdraw";

/// Arguments of a withdraw authorization
#[derive(Debug, Clone)]
pub struct WithdrawArgs {
    /// Group the funds are scoped to
    pub group_id: Hash,
    /// Currency contract the amount is denominated in
    pub currency: Address,
    /// Amount to release, full-width
    pub amount: U256,
    /// Account receiving the funds
    pub target: Address,
    /// Issuer-assigned authorization code
    pub code: U256,
    /// Unix-seconds validity bound, checked by the verifier
    pub expiration: u64,
}

/// Ordered argument block:
/// `string "withdraw", bytes32 groupId, address currency, uint256 amount,
/// address target, uint256 code, uint256 expiration`
pub fn argument_block(args: &WithdrawArgs) -> Vec<(AbiType, AbiValue)> {
    vec![
        (AbiType::String, AbiValue::String(ACTION.to_string())),
        (AbiType::FixedBytes(32), AbiValue::FixedBytes(args.group_id.as_bytes().to_vec())),
        (AbiType::Address, AbiValue::Address(args.currency)),
        (AbiType::Uint(256), AbiValue::Uint(args.amount)),
        (AbiType::Address, AbiValue::Address(args.target)),
        (AbiType::Uint(256), AbiValue::Uint(args.code)),
        (AbiType::Uint(256), AbiValue::Uint(U256::from(args.expiration))),
    ]
}

/// Canonical digest of the full argument schema. This, not the raw
/// arguments, is what gets signed.
pub fn encode_and_hash(args: &WithdrawArgs) -> Hash {
    let block = argument_block(args);
    let (types, values): (Vec<AbiType>, Vec<AbiValue>) = block.into_iter().unzip();
    hash(&AbiEncoder::encode(&types, &values).expect("static argument types match values"))
}

/// Full-argument idempotency key. Off-chain dedup bookkeeping only.
pub fn args_format(args: &WithdrawArgs) -> String {
    format!(
        "string_{}_bytes32_{}_address_{}_uint256_{}_address_{}_uint256_{}_uint256_{}",
        ACTION, args.group_id, args.currency, args.amount, args.target, args.code, args.expiration
    )
}

/// Stable action/target key used to look up prior issuance.
pub fn selector_format(args: &WithdrawArgs) -> String {
    format!("string_{}_bytes32_{}_address_{}", ACTION, args.group_id, args.target)
}

/// Code-only key.
pub fn codes_format(code: &U256) -> String {
    format!("uint256_{}", code)
}

/// Encode, hash and sign a withdraw authorization.
///
/// Pure encode-and-sign: an expiration in the past is issued without
/// complaint; rejecting it is the verifier's job.
pub fn issue(
    signer: &TypedDomainSigner,
    key: &dyn KeyHandle,
    args: &WithdrawArgs,
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
