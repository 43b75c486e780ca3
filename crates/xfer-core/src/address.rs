//! # Address Codec
//!
//! Decodes human-readable bech32 address strings into a prefix (HRP) and
//! raw payload bytes, and encodes them back.
//!
//! ## Two decode depths
//!
//! - [`decode_prefix`] verifies the checksum and returns the prefix exactly
//!   as it appears in the input. Routing compares this value byte-for-byte
//!   against the native prefix, so no case folding happens here.
//! - [`Address::from_bech32`] performs the full decode into payload bytes
//!   and enforces the [`Address`] invariants.
//!
//! Only the classic bech32 checksum is accepted; bech32m strings are
//! rejected with [`AddressError::UnsupportedVariant`].

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Maximum payload length of an address, in bytes.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Maximum prefix length accepted by the bech32 encoder.
const MAX_PREFIX_LEN: usize = 83;

const SEPARATOR: char = '1';

/// Decode only the prefix component of a bech32 address.
///
/// The checksum is verified, but the payload is not converted to bytes.
/// The returned prefix preserves the case used in `s`: `"XYZ1..."` yields
/// `"XYZ"`.
pub fn decode_prefix(s: &str) -> Result<String, AddressError> {
    let (_, _, variant) = bech32::decode(s)?;
    if variant != Variant::Bech32 {
        return Err(AddressError::UnsupportedVariant);
    }
    let sep = s
        .rfind(SEPARATOR)
        .ok_or(AddressError::Bech32(bech32::Error::MissingSeparator))?;
    Ok(s[..sep].to_string())
}

/// A decoded account address: a lowercase prefix plus opaque payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    prefix: String,
    bytes: Vec<u8>,
}

impl Address {
    /// Build an address from its parts.
    ///
    /// The prefix must be non-empty lowercase printable ASCII (at most 83
    /// characters); the payload must hold between 1 and
    /// [`MAX_ADDRESS_LEN`] bytes.
    pub fn new(prefix: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Result<Self, AddressError> {
        let prefix = prefix.into();
        let bytes = bytes.into();
        validate_prefix(&prefix)?;
        if bytes.is_empty() {
            return Err(AddressError::Empty);
        }
        if bytes.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong {
                len: bytes.len(),
                max: MAX_ADDRESS_LEN,
            });
        }
        Ok(Self { prefix, bytes })
    }

    /// Fully decode a bech32 address string.
    ///
    /// An all-uppercase input is accepted and normalized to a lowercase
    /// prefix; mixed case is rejected by the checksum layer.
    pub fn from_bech32(s: &str) -> Result<Self, AddressError> {
        let (hrp, data, variant) = bech32::decode(s)?;
        if variant != Variant::Bech32 {
            return Err(AddressError::UnsupportedVariant);
        }
        let bytes = Vec::<u8>::from_base32(&data)?;
        Self::new(hrp, bytes)
    }

    /// Encode this address as a bech32 string.
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        Ok(bech32::encode(
            &self.prefix,
            self.bytes.to_base32(),
            Variant::Bech32,
        )?)
    }

    /// The address prefix (HRP).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Re-tag the same payload bytes with another prefix.
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Result<Self, AddressError> {
        Self::new(prefix, self.bytes.clone())
    }
}

fn validate_prefix(prefix: &str) -> Result<(), AddressError> {
    if prefix.is_empty() {
        return Err(AddressError::EmptyPrefix);
    }
    let printable = prefix.bytes().all(|b| (33..=126).contains(&b));
    let lowercase = !prefix.bytes().any(|b| b.is_ascii_uppercase());
    if !printable || !lowercase || prefix.len() > MAX_PREFIX_LEN {
        return Err(AddressError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_bech32() {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let encoded = self.to_bech32().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_bech32(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC_ADDR: &str = "abc1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5nyp56l";
    const XYZ_UPPER: &str = "XYZ1QYPQXPQ9QCRSSZG2PVXQ6RS0ZQG3YYC5482QXE";
    const XYZ_BECH32M: &str = "xyz1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5qm6vrm";

    fn seq_bytes() -> Vec<u8> {
        (1u8..=20).collect()
    }

    #[test]
    fn test_full_decode() {
        let addr = Address::from_bech32(ABC_ADDR).unwrap();
        assert_eq!(addr.prefix(), "abc");
        assert_eq!(addr.as_bytes(), seq_bytes().as_slice());
    }

    #[test]
    fn test_encode_matches_known_string() {
        let addr = Address::new("abc", seq_bytes()).unwrap();
        assert_eq!(addr.to_string(), ABC_ADDR);
    }

    #[test]
    fn test_prefix_only_decode() {
        assert_eq!(decode_prefix(ABC_ADDR).unwrap(), "abc");
    }

    #[test]
    fn test_prefix_decode_preserves_uppercase() {
        assert_eq!(decode_prefix(XYZ_UPPER).unwrap(), "XYZ");
    }

    #[test]
    fn test_full_decode_normalizes_uppercase() {
        let addr = Address::from_bech32(XYZ_UPPER).unwrap();
        assert_eq!(addr.prefix(), "xyz");
        assert_eq!(addr.as_bytes(), seq_bytes().as_slice());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let tampered = "abc1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5nyp56m";
        assert!(matches!(
            decode_prefix(tampered),
            Err(AddressError::Bech32(bech32::Error::InvalidChecksum))
        ));
        assert!(Address::from_bech32(tampered).is_err());
    }

    #[test]
    fn test_mixed_case_rejected() {
        let mixed = "abc1QYPQXPQ9QCRSSZG2PVXQ6RS0ZQG3YYC5NYP56L";
        assert!(matches!(
            decode_prefix(mixed),
            Err(AddressError::Bech32(bech32::Error::MixedCase))
        ));
    }

    #[test]
    fn test_missing_separator_rejected() {
        assert!(decode_prefix("notanaddress").is_err());
        assert!(Address::from_bech32("").is_err());
    }

    #[test]
    fn test_bech32m_rejected() {
        assert_eq!(
            decode_prefix(XYZ_BECH32M),
            Err(AddressError::UnsupportedVariant)
        );
        assert_eq!(
            Address::from_bech32(XYZ_BECH32M),
            Err(AddressError::UnsupportedVariant)
        );
    }

    #[test]
    fn test_empty_payload_rejected_on_full_decode() {
        // BIP-173 valid vector with no payload.
        assert_eq!(decode_prefix("A12UEL5L").unwrap(), "A");
        assert_eq!(Address::from_bech32("A12UEL5L"), Err(AddressError::Empty));
    }

    #[test]
    fn test_new_rejects_bad_prefix() {
        assert_eq!(Address::new("", vec![1]), Err(AddressError::EmptyPrefix));
        assert!(matches!(
            Address::new("ABC", vec![1]),
            Err(AddressError::InvalidPrefix(_))
        ));
        assert!(matches!(
            Address::new("a b", vec![1]),
            Err(AddressError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_new_rejects_oversized_payload() {
        assert_eq!(
            Address::new("abc", vec![0u8; MAX_ADDRESS_LEN + 1]),
            Err(AddressError::TooLong {
                len: MAX_ADDRESS_LEN + 1,
                max: MAX_ADDRESS_LEN
            })
        );
        assert!(Address::new("abc", vec![0u8; MAX_ADDRESS_LEN]).is_ok());
    }

    #[test]
    fn test_with_prefix_keeps_bytes() {
        let addr = Address::from_bech32(ABC_ADDR).unwrap();
        let xyz = addr.with_prefix("xyz").unwrap();
        assert_eq!(xyz.as_bytes(), addr.as_bytes());
        assert_eq!(xyz.to_string(), "xyz1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5482qxe");
    }

    #[test]
    fn test_serde_as_string() {
        let addr = Address::from_bech32(ABC_ADDR).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{ABC_ADDR}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<Address>("\"abc1bogus\"").is_err());
    }
}
