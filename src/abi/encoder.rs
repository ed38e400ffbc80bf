//! Canonical ABI encoding for authorization payloads
//!
//! Head/tail word layout matching the platform contracts' decoders:
//! static values occupy one right-aligned 32-byte head word, dynamic
//! values put an offset in the head and length-prefixed padded data in
//! the tail. The entire trust chain rests on this function being a pure,
//! deterministic map from `(types, values)` to bytes.

use super::types::*;

/// ABI encoder
pub struct AbiEncoder;

impl AbiEncoder {
    /// Encode an ordered argument list.
    ///
    /// # Panics
    ///
    /// Panics when `types.len() != values.len()`. Arity mismatch is a
    /// coding defect at the call site, never external input.
    pub fn encode(types: &[AbiType], values: &[AbiValue]) -> Result<Vec<u8>, EncodeError> {
        assert_eq!(
            types.len(),
            values.len(),
            "argument arity mismatch: {} types, {} values",
            types.len(),
            values.len()
        );

        let head_size = 32 * types.len();
        let mut head = Vec::with_capacity(head_size);
        let mut tail = Vec::new();

        for (value, abi_type) in values.iter().zip(types.iter()) {
            if abi_type.is_dynamic() {
                // Head carries the offset to the tail data
                let offset = U256::from((head_size + tail.len()) as u64);
                head.extend_from_slice(&offset.to_be_bytes());
                tail.extend_from_slice(&Self::encode_value(value, abi_type)?);
            } else {
                head.extend_from_slice(&Self::encode_value(value, abi_type)?);
            }
        }

        head.extend_from_slice(&tail);
        Ok(head)
    }

    /// Encode a single value according to its declared tag.
    pub fn encode_value(value: &AbiValue, abi_type: &AbiType) -> Result<Vec<u8>, EncodeError> {
        match (value, abi_type) {
            (AbiValue::Uint(u), AbiType::Uint(_)) => Ok(u.to_be_bytes().to_vec()),

            (AbiValue::Address(addr), AbiType::Address) => {
                let mut result = [0u8; 32];
                result[12..].copy_from_slice(addr.as_bytes());
                Ok(result.to_vec())
            }

            (AbiValue::FixedBytes(bytes), AbiType::FixedBytes(size)) => {
                if bytes.len() > *size {
                    return Err(EncodeError::InvalidValue(format!(
                        "bytes{} value holds {} bytes",
                        size,
                        bytes.len()
                    )));
                }
                let mut result = [0u8; 32];
                result[..bytes.len()].copy_from_slice(bytes);
                Ok(result.to_vec())
            }

            (AbiValue::Bytes(bytes), AbiType::Bytes) => Ok(Self::encode_dynamic_bytes(bytes)),

            (AbiValue::String(s), AbiType::String) => Ok(Self::encode_dynamic_bytes(s.as_bytes())),

            _ => Err(EncodeError::TypeMismatch {
                expected: abi_type.canonical_type(),
                got: value.type_tag(),
            }),
        }
    }

    /// Length word followed by the data padded to a 32-byte boundary.
    fn encode_dynamic_bytes(bytes: &[u8]) -> Vec<u8> {
        let len = bytes.len();
        let padded_len = ((len + 31) / 32) * 32;

        let mut result = Vec::with_capacity(32 + padded_len);
        result.extend_from_slice(&U256::from(len as u64).to_be_bytes());
        result.extend_from_slice(bytes);
        result.resize(32 + padded_len, 0);

        result
    }
}
