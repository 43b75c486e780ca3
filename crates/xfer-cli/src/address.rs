//! # Address Subcommands
//!
//! `decode` and `encode` expose the address codec directly.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use xfer_core::{decode_prefix, Address};

/// Arguments for `xfer decode`.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Bech32 address to decode.
    pub address: String,

    /// Only verify the checksum and print the prefix exactly as written.
    #[arg(long)]
    pub prefix_only: bool,
}

/// Arguments for `xfer encode`.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Human-readable prefix (lowercase).
    #[arg(long)]
    pub prefix: String,

    /// Payload bytes as hex.
    #[arg(long)]
    pub hex: String,
}

/// A decoded address as printed by `xfer decode`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DecodedAddress {
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
}

/// Decode `address`, fully or prefix-only.
pub fn decode(address: &str, prefix_only: bool) -> Result<DecodedAddress> {
    if prefix_only {
        let prefix = decode_prefix(address).with_context(|| format!("cannot decode {address:?}"))?;
        return Ok(DecodedAddress { prefix, hex: None });
    }
    let decoded = Address::from_bech32(address).with_context(|| format!("cannot decode {address:?}"))?;
    Ok(DecodedAddress {
        prefix: decoded.prefix().to_string(),
        hex: Some(hex::encode(decoded.as_bytes())),
    })
}

/// Encode hex payload bytes under `prefix`.
pub fn encode(prefix: &str, payload_hex: &str) -> Result<String> {
    let bytes = hex::decode(payload_hex.trim_start_matches("0x")).context("payload is not valid hex")?;
    let address = Address::new(prefix, bytes).context("invalid address parts")?;
    Ok(address.to_bech32()?)
}

/// Run `xfer decode`.
pub fn run_decode(args: &DecodeArgs) -> Result<u8> {
    let decoded = decode(&args.address, args.prefix_only)?;
    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(0)
}

/// Run `xfer encode`.
pub fn run_encode(args: &EncodeArgs) -> Result<u8> {
    println!("{}", encode(&args.prefix, &args.hex)?);
    Ok(0)
}
