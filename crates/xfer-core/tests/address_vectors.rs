//! # Address Codec Test Vectors
//!
//! Verifies the codec against fixed vectors: the BIP-173 reference strings
//! and addresses produced by the reference bech32 encoder for the prefixes
//! used throughout the routing tests.
//!
//! If these tests fail, routing would disagree with every other bech32
//! implementation about which chain an address belongs to.

use xfer_core::{decode_prefix, Address, AddressError};

/// (address, prefix, payload hex)
const VALID: &[(&str, &str, &str)] = &[
    (
        "abc1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5nyp56l",
        "abc",
        "0102030405060708090a0b0c0d0e0f1011121314",
    ),
    (
        "xyz1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5482qxe",
        "xyz",
        "0102030405060708090a0b0c0d0e0f1011121314",
    ),
    (
        "osmo1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5helwsw",
        "osmo",
        "0102030405060708090a0b0c0d0e0f1011121314",
    ),
    (
        "abc1424242424242424242424242424242423ck78l",
        "abc",
        "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
    ),
    (
        "abc1z5tpwxqergd3c8g7ruszzg3rysjjvfegyp46jf",
        "abc",
        "15161718191a1b1c1d1e1f202122232425262728",
    ),
    // BIP-173: every charset symbol once, 20-byte payload.
    (
        "abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw",
        "abcdef",
        "00443214c74254b635cf84653a56d7c675be77df",
    ),
];

/// Strings that must fail the prefix-only decode.
const INVALID: &[&str] = &[
    // checksum altered in the last symbol
    "abc1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5nyp56m",
    "abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxx",
    // no separator
    "pzry9x0s0muk",
    // empty prefix
    "1pzry9x0s0muk",
    // invalid data character
    "x1b4n0q5v",
    // too short for a checksum
    "li1dgmt3",
    // mixed case
    "abc1QYPQXPQ9QCRSSZG2PVXQ6RS0ZQG3YYC5NYP56L",
    // bech32m checksum
    "xyz1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5qm6vrm",
];

#[test]
fn test_valid_vectors_decode() {
    for (encoded, prefix, payload) in VALID {
        let addr = Address::from_bech32(encoded)
            .unwrap_or_else(|e| panic!("{encoded} should decode: {e}"));
        assert_eq!(addr.prefix(), *prefix, "prefix of {encoded}");
        assert_eq!(hex::encode(addr.as_bytes()), *payload, "payload of {encoded}");
        assert_eq!(decode_prefix(encoded).unwrap(), *prefix);
    }
}

#[test]
fn test_valid_vectors_reencode() {
    for (encoded, _, _) in VALID {
        let addr = Address::from_bech32(encoded).unwrap();
        assert_eq!(addr.to_string(), *encoded);
    }
}

#[test]
fn test_invalid_vectors_rejected() {
    for encoded in INVALID {
        assert!(
            decode_prefix(encoded).is_err(),
            "{encoded} should be rejected by the prefix decode"
        );
        assert!(
            Address::from_bech32(encoded).is_err(),
            "{encoded} should be rejected by the full decode"
        );
    }
}

#[test]
fn test_same_payload_different_prefix_differs() {
    let abc = Address::from_bech32(VALID[0].0).unwrap();
    let xyz = Address::from_bech32(VALID[1].0).unwrap();
    assert_eq!(abc.as_bytes(), xyz.as_bytes());
    assert_ne!(abc, xyz);
}

#[test]
fn test_uppercase_vector_prefix_case() {
    let upper = VALID[1].0.to_uppercase();
    assert_eq!(decode_prefix(&upper).unwrap(), "XYZ");
    assert_eq!(Address::from_bech32(&upper).unwrap().prefix(), "xyz");
    assert!(matches!(
        Address::new("XYZ", vec![1u8]),
        Err(AddressError::InvalidPrefix(_))
    ));
}
