//! Mint Authorization
//!
//! Approves minting tickets to a recipient within a group, together with
//! the packed price list the contract charges against.

use super::{issue_signed, AuthorizationToken};
use crate::abi::{AbiEncoder, AbiType, AbiValue, U256};
use crate::address::Address;
use crate::error::IssueError;
use crate::hash::{hash, Hash};
use crate::logging::Logger;
use crate::typed_data::{KeyHandle, TypedDomainSigner};

/// Action tag; first encoded field of every mint digest.
pub const ACTION: &str = "mint";

/// One `(currency, value)` element of a mint price list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceEntry {
    pub currency: Address,
    pub value: U256,
}

/// Pack a price list into a single byte string.
///
/// Each entry contributes its raw 20-byte currency address followed by
/// the 32-byte big-endian value, in caller order. No sorting happens
/// here; the contract iterates the same caller-guaranteed order.
pub fn pack_price_list(entries: &[PriceEntry]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(entries.len() * 52);
    for entry in entries {
        packed.extend_from_slice(entry.currency.as_bytes());
        packed.extend_from_slice(&entry.value.to_be_bytes());
    }
    packed
}

/// Arguments of a mint authorization
#[derive(Debug, Clone)]
pub struct MintArgs {
    /// Group the mint is scoped to
    pub group_id: Hash,
    /// Account receiving the tickets
    pub recipient: Address,
    /// Packed price list (see [`pack_price_list`])
    pub price_list: Vec<u8>,
    /// Issuer-assigned authorization code
    pub code: U256,
    /// Unix-seconds validity bound, checked by the verifier
    pub expiration: u64,
}

/// Ordered argument block:
/// `string "mint", bytes32 groupId, address recipient, bytes priceList,
/// uint256 code, uint256 expiration`
pub fn argument_block(args: &MintArgs) -> Vec<(AbiType, AbiValue)> {
    vec![
        (AbiType::String, AbiValue::String(ACTION.to_string())),
        (AbiType::FixedBytes(32), AbiValue::FixedBytes(args.group_id.as_bytes().to_vec())),
        (AbiType::Address, AbiValue::Address(args.recipient)),
        (AbiType::Bytes, AbiValue::Bytes(args.price_list.clone())),
        (AbiType::Uint(256), AbiValue::Uint(args.code)),
        (AbiType::Uint(256), AbiValue::Uint(U256::from(args.expiration))),
    ]
}

/// Canonical digest of the full argument schema.
pub fn encode_and_hash(args: &MintArgs) -> Hash {
    let block = argument_block(args);
    let (types, values): (Vec<AbiType>, Vec<AbiValue>) = block.into_iter().unzip();
    hash(&AbiEncoder::encode(&types, &values).expect("static argument types match values"))
}

/// Full-argument idempotency key. Off-chain dedup bookkeeping only.
pub fn args_format(args: &MintArgs) -> String {
    format!(
        "string_{}_bytes32_{}_address_{}_bytes_0x{}_uint256_{}_uint256_{}",
        ACTION,
        args.group_id,
        args.recipient,
        hex::encode(&args.price_list),
        args.code,
        args.expiration
    )
}

/// Stable action/recipient key used to look up prior issuance.
pub fn selector_format(args: &MintArgs) -> String {
    format!("string_{}_bytes32_{}_address_{}", ACTION, args.group_id, args.recipient)
}

/// Code-only key.
pub fn codes_format(code: &U256) -> String {
    format!("uint256_{}", code)
}

/// Encode, hash and sign a mint authorization.
pub fn issue(
    signer: &TypedDomainSigner,
    key: &dyn KeyHandle,
    args: &MintArgs,
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

    fn test_price_list() -> Vec<PriceEntry> {
        vec![
            PriceEntry {
                currency: Address::parse("0x0618A298E7a1d15d251fb2a00056E4db74869d8A").unwrap(),
                value: U256::from_dec("25000000000000000000").unwrap(),
            },
            PriceEntry {
                currency: Address::parse("0x0000000000000000000000000000000000000000").unwrap(),
                value: U256::from(99),
            },
        ]
    }

    fn test_args() -> MintArgs {
        MintArgs {
            group_id: hash(b"group"),
            recipient: Address::parse("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826").unwrap(),
            price_list: pack_price_list(&test_price_list()),
            code: U256::from(3),
            expiration: 1_893_456_000,
        }
    }

    #[test]
    fn test_pack_price_list_layout() {
        let packed = pack_price_list(&test_price_list());
        assert_eq!(packed.len(), 2 * 52);

        // First entry: 20-byte currency, then 32-byte value
        assert_eq!(&packed[..20], Address::parse("0x0618A298E7a1d15d251fb2a00056E4db74869d8A").unwrap().as_bytes());
        assert_eq!(&packed[20..52], &U256::from_dec("25000000000000000000").unwrap().to_be_bytes());

        // Second entry follows immediately
        assert_eq!(&packed[52..72], &[0u8; 20]);
        assert_eq!(packed[103], 99);
    }

    #[test]
    fn test_pack_price_list_is_order_sensitive() {
        let mut reversed = test_price_list();
        reversed.reverse();
        assert_ne!(pack_price_list(&test_price_list()), pack_price_list(&reversed));
    }

    #[test]
    fn test_pack_price_list_empty() {
        assert!(pack_price_list(&[]).is_empty());
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(encode_and_hash(&test_args()), encode_and_hash(&test_args()));
    }

    #[test]
    fn test_args_format_carries_packed_bytes() {
        let key = args_format(&test_args());
        assert!(key.starts_with("string_mint_bytes32_0x"));
        assert!(key.contains("_bytes_0x0618a298"));
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
