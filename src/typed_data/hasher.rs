//! Typed-Data Hashing
//!
//! Domain separator and struct hashing, combined into the root hash
//! that actually gets signed.

use super::encoder::{encode_data, SchemaTable};
use super::types::{Domain, TypedDataError};
use crate::abi::U256;
use crate::hash::keccak256;

/// Magic prefix for the typed-data root hash
const TYPED_DATA_PREFIX: &[u8] = b"\x19\x01";

/// Canonical domain type string; the domain always carries all four fields.
const DOMAIN_TYPE: &str = "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Calculate the domain separator hash
///
/// domainSeparator = hashStruct(eip712Domain)
pub fn domain_separator(domain: &Domain) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(5 * 32);

    encoded.extend_from_slice(&keccak256(DOMAIN_TYPE.as_bytes()));
    encoded.extend_from_slice(&keccak256(domain.name.as_bytes()));
    encoded.extend_from_slice(&keccak256(domain.version.as_bytes()));
    encoded.extend_from_slice(&U256::from(domain.chain_id).to_be_bytes());

    let mut contract_word = [0u8; 32];
    contract_word[12..].copy_from_slice(domain.verifying_contract.as_bytes());
    encoded.extend_from_slice(&contract_word);

    keccak256(&encoded)
}

/// Hash a struct payload against its registered schema
///
/// hashStruct(s) = keccak256(typeHash || encodeData(s))
pub fn hash_struct(
    type_name: &str,
    payload: &serde_json::Value,
    types: &SchemaTable,
) -> Result<[u8; 32], TypedDataError> {
    let encoded = encode_data(type_name, payload, types)?;
    Ok(keccak256(&encoded))
}

/// Combine domain separator and struct hash into the root hash
///
/// root = keccak256("\x19\x01" || domainSeparator || structHash)
pub fn typed_data_root(domain_sep: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    let mut data = Vec::with_capacity(2 + 32 + 32);
    data.extend_from_slice(TYPED_DATA_PREFIX);
    data.extend_from_slice(domain_sep);
    data.extend_from_slice(struct_hash);

    keccak256(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    fn test_domain() -> Domain {
        Domain::new(
            "ticket721",
            "1",
            1,
            Address::parse("0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC").unwrap(),
        )
    }

    #[test]
    fn test_domain_separator_deterministic() {
        let a = domain_separator(&test_domain());
        let b = domain_separator(&test_domain());
        assert_eq!(a, b);
    }

    #[test]
    fn test_domain_separator_binds_every_field() {
        let base = domain_separator(&test_domain());

        let mut d = test_domain();
        d.chain_id = 137;
        assert_ne!(base, domain_separator(&d));

        let mut d = test_domain();
        d.version = "2".to_string();
        assert_ne!(base, domain_separator(&d));

        let mut d = test_domain();
        d.name = "other-protocol".to_string();
        assert_ne!(base, domain_separator(&d));

        let mut d = test_domain();
        d.verifying_contract = Address::parse("0x0000000000000000000000000000000000000001").unwrap();
        assert_ne!(base, domain_separator(&d));
    }

    #[test]
    fn test_root_hash_binds_both_parts() {
        let sep_a = [1u8; 32];
        let sep_b = [2u8; 32];
        let sh = [3u8; 32];

        assert_ne!(typed_data_root(&sep_a, &sh), typed_data_root(&sep_b, &sh));
        assert_ne!(typed_data_root(&sep_a, &sh), typed_data_root(&sep_a, &sep_b));
    }
}
