//! Typed-Data Encoding
//!
//! Encoding rules for structured data over a registered schema table:
//! type strings, type hashes, and recursive field encoding.

use super::types::{FieldDef, TypedDataError};
use crate::abi::U256;
use crate::address::Address;
use crate::hash::keccak256;
use std::collections::{HashMap, HashSet};

/// Struct name -> ordered field list, fixed at signer construction.
pub type SchemaTable = HashMap<String, Vec<FieldDef>>;

/// Encode a type string for a struct type
/// Format: "TypeName(type1 name1,type2 name2,...)"
pub fn encode_type(type_name: &str, types: &SchemaTable) -> Result<String, TypedDataError> {
    let fields = types
        .get(type_name)
        .ok_or_else(|| TypedDataError::UnknownSchema(type_name.to_string()))?;

    // Primary type first, then dependencies alphabetically
    let dependencies = find_type_dependencies(type_name, types);

    let mut result = format_type_string(type_name, fields);

    let mut sorted_deps: Vec<_> = dependencies.into_iter().filter(|dep| dep != type_name).collect();
    sorted_deps.sort();

    for dep in sorted_deps {
        if let Some(dep_fields) = types.get(&dep) {
            result.push_str(&format_type_string(&dep, dep_fields));
        }
    }

    Ok(result)
}

fn format_type_string(type_name: &str, fields: &[FieldDef]) -> String {
    let field_strs: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect();

    format!("{}({})", type_name, field_strs.join(","))
}

/// Find all type dependencies (including nested structs)
pub fn find_type_dependencies(type_name: &str, types: &SchemaTable) -> HashSet<String> {
    let mut dependencies = HashSet::new();
    let mut to_visit = vec![type_name.to_string()];

    while let Some(current) = to_visit.pop() {
        if dependencies.contains(&current) {
            continue;
        }

        if let Some(fields) = types.get(&current) {
            dependencies.insert(current.clone());

            for field in fields {
                let base_type = get_base_type(&field.type_name);
                if types.contains_key(base_type) && !dependencies.contains(base_type) {
                    to_visit.push(base_type.to_string());
                }
            }
        }
    }

    dependencies
}

/// Get the base type from a potentially array type
/// e.g., "Asset[]" -> "Asset", "uint256[4]" -> "uint256"
pub fn get_base_type(type_name: &str) -> &str {
    if let Some(bracket_pos) = type_name.find('[') {
        &type_name[..bracket_pos]
    } else {
        type_name
    }
}

/// Calculate the type hash for a struct type
/// typeHash = keccak256(encodeType(typeOf(s)))
pub fn type_hash(type_name: &str, types: &SchemaTable) -> Result<[u8; 32], TypedDataError> {
    let encoded = encode_type(type_name, types)?;
    Ok(keccak256(encoded.as_bytes()))
}

/// Encode a payload value according to its declared type
pub fn encode_data(
    type_name: &str,
    value: &serde_json::Value,
    types: &SchemaTable,
) -> Result<Vec<u8>, TypedDataError> {
    let base_type = get_base_type(type_name);

    if type_name.contains('[') {
        return encode_array(type_name, value, types);
    }

    if base_type == "bytes" {
        return encode_bytes(value);
    }
    if base_type == "string" {
        return encode_string(value);
    }

    if types.contains_key(base_type) {
        return encode_struct(base_type, value, types);
    }

    encode_atomic(type_name, value)
}

/// Encode a struct value: typeHash followed by each field, with struct
/// references and dynamic fields replaced by their hashes.
fn encode_struct(
    type_name: &str,
    value: &serde_json::Value,
    types: &SchemaTable,
) -> Result<Vec<u8>, TypedDataError> {
    let obj = value.as_object().ok_or_else(|| TypedDataError::InvalidValue {
        type_name: type_name.to_string(),
        value: value.to_string(),
    })?;

    let fields = types
        .get(type_name)
        .ok_or_else(|| TypedDataError::UnknownSchema(type_name.to_string()))?;

    let mut encoded = Vec::new();
    encoded.extend_from_slice(&type_hash(type_name, types)?);

    for field in fields {
        let field_value = obj
            .get(&field.name)
            .ok_or_else(|| TypedDataError::MissingField(format!("{}.{}", type_name, field.name)))?;

        let encoded_field = encode_data(&field.type_name, field_value, types)?;

        let is_reference = types.contains_key(get_base_type(&field.type_name)) || field.type_name.contains('[');
        if is_reference || is_dynamic_type(&field.type_name) {
            encoded.extend_from_slice(&keccak256(&encoded_field));
        } else {
            encoded.extend(encoded_field);
        }
    }

    Ok(encoded)
}

fn encode_array(
    type_name: &str,
    value: &serde_json::Value,
    types: &SchemaTable,
) -> Result<Vec<u8>, TypedDataError> {
    let arr = value.as_array().ok_or_else(|| TypedDataError::InvalidValue {
        type_name: type_name.to_string(),
        value: value.to_string(),
    })?;

    let bracket_pos = type_name
        .find('[')
        .ok_or_else(|| TypedDataError::InvalidType(type_name.to_string()))?;
    let element_type = &type_name[..bracket_pos];

    let mut encoded = Vec::new();

    for item in arr {
        let item_encoded = encode_data(element_type, item, types)?;

        if types.contains_key(element_type) || is_dynamic_type(element_type) {
            encoded.extend_from_slice(&keccak256(&item_encoded));
        } else {
            encoded.extend(item_encoded);
        }
    }

    Ok(encoded)
}

/// Encode an atomic (fixed-size) value into one 32-byte word
fn encode_atomic(type_name: &str, value: &serde_json::Value) -> Result<Vec<u8>, TypedDataError> {
    let mut result = [0u8; 32];

    // address - 20 bytes, left-padded to 32
    if type_name == "address" {
        let addr_str = value.as_str().ok_or_else(|| TypedDataError::InvalidValue {
            type_name: type_name.to_string(),
            value: value.to_string(),
        })?;
        let addr = Address::parse(addr_str)
            .ok_or_else(|| TypedDataError::InvalidAddress(addr_str.to_string()))?;
        result[12..].copy_from_slice(addr.as_bytes());
        return Ok(result.to_vec());
    }

    if type_name == "bool" {
        let b = value.as_bool().ok_or_else(|| TypedDataError::InvalidValue {
            type_name: type_name.to_string(),
            value: value.to_string(),
        })?;
        result[31] = if b { 1 } else { 0 };
        return Ok(result.to_vec());
    }

    // uintN - full-width big-endian word, arbitrary precision input
    if type_name.starts_with("uint") {
        let parsed = parse_uint(value)?;
        return Ok(parsed.to_be_bytes().to_vec());
    }

    // bytesN (fixed-size bytes, right-padded)
    if let Some(size_str) = type_name.strip_prefix("bytes") {
        let size: usize = size_str
            .parse()
            .map_err(|_| TypedDataError::InvalidType(type_name.to_string()))?;

        let hex_str = value.as_str().ok_or_else(|| TypedDataError::InvalidValue {
            type_name: type_name.to_string(),
            value: value.to_string(),
        })?;

        let bytes = parse_hex(hex_str)?;
        if bytes.len() > size || size > 32 {
            return Err(TypedDataError::InvalidValue {
                type_name: type_name.to_string(),
                value: format!("bytes too long: {} > {}", bytes.len(), size),
            });
        }

        result[..bytes.len()].copy_from_slice(&bytes);
        return Ok(result.to_vec());
    }

    Err(TypedDataError::InvalidType(type_name.to_string()))
}

/// Encode dynamic bytes (hashed by the caller)
fn encode_bytes(value: &serde_json::Value) -> Result<Vec<u8>, TypedDataError> {
    let hex_str = value.as_str().ok_or_else(|| TypedDataError::InvalidValue {
        type_name: "bytes".to_string(),
        value: value.to_string(),
    })?;

    parse_hex(hex_str)
}

/// Encode a string value (hashed by the caller)
fn encode_string(value: &serde_json::Value) -> Result<Vec<u8>, TypedDataError> {
    let s = value.as_str().ok_or_else(|| TypedDataError::InvalidValue {
        type_name: "string".to_string(),
        value: value.to_string(),
    })?;

    Ok(s.as_bytes().to_vec())
}

/// Parse a uint from a JSON number or string.
///
/// Decimal strings go through the arbitrary-precision path, so amounts
/// above 2^53 lose nothing. Floats fail.
fn parse_uint(value: &serde_json::Value) -> Result<U256, TypedDataError> {
    let invalid = || TypedDataError::InvalidValue {
        type_name: "uint256".to_string(),
        value: value.to_string(),
    };

    match value {
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(U256::from(u));
            }
            U256::from_dec(&n.to_string()).map_err(|_| invalid())
        }
        serde_json::Value::String(s) => {
            if let Some(body) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                U256::from_hex(body).map_err(|_| invalid())
            } else {
                U256::from_dec(s).map_err(|_| invalid())
            }
        }
        _ => Err(invalid()),
    }
}

/// Parse a hex string (with or without 0x prefix)
fn parse_hex(s: &str) -> Result<Vec<u8>, TypedDataError> {
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

    hex::decode(s).map_err(|e| TypedDataError::Encoding(format!("invalid hex: {}", e)))
}

/// Check if a type is an atomic (fixed-size) type
pub fn is_atomic_type(type_name: &str) -> bool {
    if type_name == "address" || type_name == "bool" {
        return true;
    }

    if let Some(bits_str) = type_name.strip_prefix("uint") {
        if let Ok(n) = bits_str.parse::<u32>() {
            return n > 0 && n <= 256 && n % 8 == 0;
        }
    }

    if type_name.starts_with("bytes") && type_name != "bytes" {
        if let Ok(n) = type_name[5..].parse::<u32>() {
            return n > 0 && n <= 32;
        }
    }

    false
}

/// Check if a type is a dynamic type
pub fn is_dynamic_type(type_name: &str) -> bool {
    type_name == "bytes" || type_name == "string"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[(&str, &str)])]) -> SchemaTable {
        entries
            .iter()
            .map(|(name, fields)| {
                (
                    name.to_string(),
                    fields.iter().map(|(n, t)| FieldDef::new(*n, *t)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_encode_type_simple() {
        let types = table(&[("Authorization", &[("digest", "bytes32")])]);
        let encoded = encode_type("Authorization", &types).unwrap();
        assert_eq!(encoded, "Authorization(bytes32 digest)");
    }

    #[test]
    fn test_encode_type_with_dependencies() {
        let types = table(&[
            ("Order", &[("maker", "Party"), ("taker", "Party"), ("memo", "string")]),
            ("Party", &[("account", "address"), ("amount", "uint256")]),
        ]);

        let encoded = encode_type("Order", &types).unwrap();
        assert_eq!(
            encoded,
            "Order(Party maker,Party taker,string memo)Party(address account,uint256 amount)"
        );
    }

    #[test]
    fn test_encode_type_unknown() {
        let types = table(&[]);
        assert!(matches!(
            encode_type("Missing", &types),
            Err(TypedDataError::UnknownSchema(_))
        ));
    }

    #[test]
    fn test_atomic_types() {
        assert!(is_atomic_type("address"));
        assert!(is_atomic_type("bool"));
        assert!(is_atomic_type("uint256"));
        assert!(is_atomic_type("uint8"));
        assert!(is_atomic_type("bytes32"));
        assert!(is_atomic_type("bytes1"));

        assert!(!is_atomic_type("string"));
        assert!(!is_atomic_type("bytes"));
        assert!(!is_atomic_type("uint"));
        assert!(!is_atomic_type("uint257"));
        assert!(!is_atomic_type("bytes33"));
    }

    #[test]
    fn test_dynamic_types() {
        assert!(is_dynamic_type("bytes"));
        assert!(is_dynamic_type("string"));

        assert!(!is_dynamic_type("bytes32"));
        assert!(!is_dynamic_type("address"));
    }

    #[test]
    fn test_get_base_type() {
        assert_eq!(get_base_type("Asset[]"), "Asset");
        assert_eq!(get_base_type("uint256[4]"), "uint256");
        assert_eq!(get_base_type("address"), "address");
    }

    #[test]
    fn test_encode_atomic_uint_large_decimal() {
        // Above 2^53: must not lose precision
        let word = encode_atomic("uint256", &serde_json::json!("36893488147419103232")).unwrap();
        assert_eq!(word.len(), 32);
        // 2^65 = 0x2_0000_0000_0000_0000
        assert_eq!(word[23], 2);
        assert_eq!(&word[24..], &[0u8; 8]);
    }

    #[test]
    fn test_encode_atomic_rejects_float() {
        assert!(encode_atomic("uint256", &serde_json::json!(1.5)).is_err());
    }

    #[test]
    fn test_encode_atomic_bytes32() {
        let digest = format!("0x{}", "ab".repeat(32));
        let word = encode_atomic("bytes32", &serde_json::json!(digest)).unwrap();
        assert_eq!(word, vec![0xab; 32]);

        let too_long = format!("0x{}", "ab".repeat(33));
        assert!(encode_atomic("bytes32", &serde_json::json!(too_long)).is_err());
    }

    #[test]
    fn test_struct_missing_field() {
        let types = table(&[("Authorization", &[("digest", "bytes32")])]);
        let result = encode_data("Authorization", &serde_json::json!({}), &types);
        assert!(matches!(result, Err(TypedDataError::MissingField(_))));
    }
}
