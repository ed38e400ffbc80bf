//! ABI type tags and runtime values for the parameter encoder

use crate::address::Address;
use std::fmt;

/// Type tags accepted by the parameter encoder.
///
/// The set is closed: these are the only shapes the platform's contracts
/// decode from authorization payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiType {
    /// Dynamic UTF-8 string
    String,

    /// 20-byte account/contract address
    Address,

    /// uintN, N in 8..=256 and a multiple of 8
    Uint(usize),

    /// Dynamic byte string
    Bytes,

    /// bytesN, N in 1..=32
    FixedBytes(usize),
}

impl AbiType {
    /// Parse a tag from its canonical string representation.
    pub fn from_str(s: &str) -> Result<Self, EncodeError> {
        match s {
            "string" => return Ok(AbiType::String),
            "address" => return Ok(AbiType::Address),
            "bytes" => return Ok(AbiType::Bytes),
            "uint" => return Ok(AbiType::Uint(256)),
            _ => {}
        }

        if let Some(size_str) = s.strip_prefix("bytes") {
            let size: usize = size_str
                .parse()
                .map_err(|_| EncodeError::InvalidType(format!("invalid bytes size: {}", size_str)))?;
            if size == 0 || size > 32 {
                return Err(EncodeError::InvalidType(format!("bytes size must be 1-32: {}", size)));
            }
            return Ok(AbiType::FixedBytes(size));
        }

        if let Some(bits_str) = s.strip_prefix("uint") {
            let bits: usize = bits_str
                .parse()
                .map_err(|_| EncodeError::InvalidType(format!("invalid uint size: {}", bits_str)))?;
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(EncodeError::InvalidType(format!("unsupported uint size: {}", bits)));
            }
            return Ok(AbiType::Uint(bits));
        }

        Err(EncodeError::InvalidType(format!("unknown type: {}", s)))
    }

    /// Whether this type is encoded through the tail with a head offset.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, AbiType::String | AbiType::Bytes)
    }

    /// Canonical type string
    pub fn canonical_type(&self) -> String {
        match self {
            AbiType::String => "string".to_string(),
            AbiType::Address => "address".to_string(),
            AbiType::Uint(bits) => format!("uint{}", bits),
            AbiType::Bytes => "bytes".to_string(),
            AbiType::FixedBytes(size) => format!("bytes{}", size),
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_type())
    }
}

/// Runtime values paired with [`AbiType`] tags at encode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    String(String),
    Address(Address),
    Uint(U256),
    Bytes(Vec<u8>),
    FixedBytes(Vec<u8>),
}

impl AbiValue {
    /// Tag describing this value's own shape, used in mismatch reports.
    pub fn type_tag(&self) -> String {
        match self {
            AbiValue::String(_) => "string".to_string(),
            AbiValue::Address(_) => "address".to_string(),
            AbiValue::Uint(_) => "uint256".to_string(),
            AbiValue::Bytes(_) => "bytes".to_string(),
            AbiValue::FixedBytes(b) => format!("bytes{}", b.len()),
        }
    }
}

/// 256-bit unsigned integer
///
/// Monetary amounts and codes are carried at full width; there is no
/// floating-point construction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U256(pub [u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0, 0, 0, 0]);
    pub const ONE: U256 = U256([1, 0, 0, 0]);
    pub const MAX: U256 = U256([u64::MAX, u64::MAX, u64::MAX, u64::MAX]);

    /// Create from u64
    pub fn from(value: u64) -> Self {
        U256([value, 0, 0, 0])
    }

    /// Create from u128
    pub fn from_u128(value: u128) -> Self {
        U256([value as u64, (value >> 64) as u64, 0, 0])
    }

    /// Create from bytes (big-endian)
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let mut padded = [0u8; 32];
        let start = 32 - bytes.len().min(32);
        padded[start..].copy_from_slice(&bytes[..bytes.len().min(32)]);

        let mut result = [0u64; 4];
        for i in 0..4 {
            let offset = (3 - i) * 8;
            result[i] = u64::from_be_bytes(padded[offset..offset + 8].try_into().unwrap());
        }
        U256(result)
    }

    /// Convert to bytes (big-endian, 32 bytes)
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for i in 0..4 {
            let offset = (3 - i) * 8;
            bytes[offset..offset + 8].copy_from_slice(&self.0[i].to_be_bytes());
        }
        bytes
    }

    /// Parse from hex string (without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, EncodeError> {
        if s.is_empty() || s.len() > 64 {
            return Err(EncodeError::InvalidValue(format!("invalid hex integer: {}", s)));
        }
        let padded = if s.len() % 2 == 1 { format!("0{}", s) } else { s.to_string() };
        let bytes = hex::decode(&padded)
            .map_err(|_| EncodeError::InvalidValue(format!("invalid hex integer: {}", s)))?;
        Ok(Self::from_be_bytes(&bytes))
    }

    /// Parse from decimal string
    pub fn from_dec(s: &str) -> Result<Self, EncodeError> {
        if s.is_empty() {
            return Err(EncodeError::InvalidValue("empty decimal string".to_string()));
        }
        let mut result = U256::ZERO;
        for c in s.chars() {
            if !c.is_ascii_digit() {
                return Err(EncodeError::InvalidValue(format!("invalid decimal digit: {}", c)));
            }
            result = result.checked_mul_u64(10).ok_or(EncodeError::Overflow)?;
            result = result
                .checked_add(U256::from(c.to_digit(10).unwrap() as u64))
                .ok_or(EncodeError::Overflow)?;
        }
        Ok(result)
    }

    /// Checked addition
    pub fn checked_add(&self, other: U256) -> Option<U256> {
        let mut result = [0u64; 4];
        let mut carry = 0u64;

        for i in 0..4 {
            let (sum1, c1) = self.0[i].overflowing_add(other.0[i]);
            let (sum2, c2) = sum1.overflowing_add(carry);
            result[i] = sum2;
            carry = (c1 as u64) + (c2 as u64);
        }

        if carry != 0 {
            None
        } else {
            Some(U256(result))
        }
    }

    /// Checked multiplication by u64
    pub fn checked_mul_u64(&self, other: u64) -> Option<U256> {
        let mut result = [0u64; 4];
        let mut carry = 0u128;

        for i in 0..4 {
            let prod = (self.0[i] as u128) * (other as u128) + carry;
            result[i] = prod as u64;
            carry = prod >> 64;
        }

        if carry != 0 {
            None
        } else {
            Some(U256(result))
        }
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0, 0]
    }

    /// Get as u64 (truncates)
    pub fn as_u64(&self) -> u64 {
        self.0[0]
    }

    /// Decimal string, no leading zeros.
    pub fn to_dec(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }

        let mut limbs = self.0;
        let mut digits = Vec::new();
        while limbs != [0u64; 4] {
            let mut rem: u64 = 0;
            for limb in limbs.iter_mut().rev() {
                let cur = ((rem as u128) << 64) | (*limb as u128);
                *limb = (cur / 10) as u64;
                rem = (cur % 10) as u64;
            }
            digits.push(rem as u8);
        }

        digits.iter().rev().map(|d| (b'0' + d) as char).collect()
    }

    /// Lowercase hex string, 32 bytes, no prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_be_bytes())
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dec())
    }
}

/// Encoding errors
///
/// These indicate a coding defect in the caller (wrong value shape for a
/// declared tag, out-of-range sizes), not bad external input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EncodeError {
    #[error("invalid type: {0}")]
    InvalidType(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("numeric overflow")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_str() {
        assert_eq!(AbiType::from_str("string").unwrap(), AbiType::String);
        assert_eq!(AbiType::from_str("address").unwrap(), AbiType::Address);
        assert_eq!(AbiType::from_str("uint256").unwrap(), AbiType::Uint(256));
        assert_eq!(AbiType::from_str("uint").unwrap(), AbiType::Uint(256));
        assert_eq!(AbiType::from_str("uint8").unwrap(), AbiType::Uint(8));
        assert_eq!(AbiType::from_str("bytes").unwrap(), AbiType::Bytes);
        assert_eq!(AbiType::from_str("bytes32").unwrap(), AbiType::FixedBytes(32));

        assert!(AbiType::from_str("uint257").is_err());
        assert!(AbiType::from_str("uint12").is_err());
        assert!(AbiType::from_str("uint16").is_ok());
        assert!(AbiType::from_str("bytes33").is_err());
        assert!(AbiType::from_str("bytes0").is_err());
        assert!(AbiType::from_str("bool").is_err());
        assert!(AbiType::from_str("int256").is_err());
    }

    #[test]
    fn test_is_dynamic() {
        assert!(AbiType::String.is_dynamic());
        assert!(AbiType::Bytes.is_dynamic());
        assert!(!AbiType::Address.is_dynamic());
        assert!(!AbiType::Uint(256).is_dynamic());
        assert!(!AbiType::FixedBytes(32).is_dynamic());
    }

    #[test]
    fn test_u256_from_dec() {
        let value = U256::from_dec("12345").unwrap();
        assert_eq!(value.as_u64(), 12345);

        // Above 2^64
        let value = U256::from_dec("18446744073709551616").unwrap();
        assert_eq!(value.0, [0, 1, 0, 0]);

        assert!(U256::from_dec("").is_err());
        assert!(U256::from_dec("12.5").is_err());
        assert!(U256::from_dec("-1").is_err());
    }

    #[test]
    fn test_u256_from_dec_overflow() {
        // 2^256 exactly
        let too_big = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(U256::from_dec(too_big), Err(EncodeError::Overflow)));

        // 2^256 - 1 still fits
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(U256::from_dec(max).unwrap(), U256::MAX);
    }

    #[test]
    fn test_u256_from_hex() {
        assert_eq!(U256::from_hex("ff").unwrap().as_u64(), 255);
        assert_eq!(U256::from_hex("f").unwrap().as_u64(), 15);
        assert!(U256::from_hex("").is_err());
        assert!(U256::from_hex(&"f".repeat(65)).is_err());
    }

    #[test]
    fn test_u256_to_be_bytes() {
        let value = U256::from(256);
        let bytes = value.to_be_bytes();
        assert_eq!(bytes[30], 1);
        assert_eq!(bytes[31], 0);
    }

    #[test]
    fn test_u256_decimal_round_trip() {
        for s in [
            "0",
            "1",
            "123",
            "18446744073709551616",
            "340282366920938463463374607431768211456",
        ] {
            assert_eq!(U256::from_dec(s).unwrap().to_dec(), s);
        }
        assert_eq!(
            U256::MAX.to_dec(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }
}
