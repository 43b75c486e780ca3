//! # Network Configuration
//!
//! A YAML description of one chain's view of the network: its native
//! prefix, the channels foreign prefixes map to, the light-client heights
//! behind those channels, send policy, blocklist and starting balances.
//! The in-memory collaborators in [`crate::memory`] are built from it.
//!
//! ```yaml
//! native_prefix: abc
//! channels:
//!   xyz: { source_channel: channel-7, timeout_height_offset: 1000 }
//! remote_heights:
//!   - { channel: channel-7, height: { revision_number: 1, revision_height: 500 } }
//! send_disabled: [ustake]
//! balances:
//!   abc1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5nyp56l: "1000uabc"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xfer_core::{coin::validate_denom, Address, AddressError, ChannelRecord, CoinError, CoinSet, Height};

use crate::traits::DEFAULT_TRANSFER_PORT;

/// Errors loading or validating a [`NetworkConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The YAML is malformed or does not match the schema.
    #[error("failed to parse network config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The native prefix is empty or not lowercase.
    #[error("invalid native prefix {0:?}")]
    NativePrefix(String),

    /// A channel is registered for an empty prefix or the native prefix.
    #[error("channel prefix {0:?} must be non-empty and differ from the native prefix")]
    ChannelPrefix(String),

    /// A channel record names no channel.
    #[error("channel for prefix {0:?} has an empty channel id")]
    EmptyChannelId(String),

    /// A blocked address or balance key does not decode.
    #[error("invalid address {address:?}: {source}")]
    Address {
        /// The address as written.
        address: String,
        /// Decode failure.
        source: AddressError,
    },

    /// A balance string does not parse as a coin set.
    #[error("invalid balance for {address}: {source}")]
    Balance {
        /// The account.
        address: String,
        /// Parse failure.
        source: CoinError,
    },

    /// A send-disabled denomination is malformed.
    #[error("invalid send-disabled denomination: {0}")]
    Denom(CoinError),
}

/// Light-client height behind one outbound port/channel pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteHeight {
    /// Outbound port.
    #[serde(default = "default_transfer_port")]
    pub port: String,
    /// Outbound channel.
    pub channel: String,
    /// Latest verified height of the counterparty.
    pub height: Height,
}

/// One chain's view of the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Prefix of addresses that settle locally.
    pub native_prefix: String,
    /// Port outbound transfers are sent from.
    #[serde(default = "default_transfer_port")]
    pub transfer_port: String,
    /// Foreign prefix to outbound channel.
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelRecord>,
    /// Light-client heights per port/channel.
    #[serde(default)]
    pub remote_heights: Vec<RemoteHeight>,
    /// Denominations that may not be sent.
    #[serde(default)]
    pub send_disabled: Vec<String>,
    /// Addresses that may not receive funds.
    #[serde(default)]
    pub blocked: Vec<String>,
    /// Starting balances, as coin lists (`"100uabc,5uatom"`).
    #[serde(default)]
    pub balances: BTreeMap<String, String>,
}

fn default_transfer_port() -> String {
    DEFAULT_TRANSFER_PORT.to_string()
}

impl NetworkConfig {
    /// A configuration with only a native prefix.
    pub fn new(native_prefix: impl Into<String>) -> Self {
        Self {
            native_prefix: native_prefix.into(),
            transfer_port: default_transfer_port(),
            channels: BTreeMap::new(),
            remote_heights: Vec::new(),
            send_disabled: Vec::new(),
            blocked: Vec::new(),
            balances: BTreeMap::new(),
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: NetworkConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            native_prefix = %config.native_prefix,
            channels = config.channels.len(),
            "loaded network config"
        );
        Ok(config)
    }

    /// Check the cross-field rules serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let native_ok = !self.native_prefix.is_empty()
            && !self.native_prefix.bytes().any(|b| b.is_ascii_uppercase() || b.is_ascii_whitespace());
        if !native_ok {
            return Err(ConfigError::NativePrefix(self.native_prefix.clone()));
        }
        for (prefix, record) in &self.channels {
            if prefix.is_empty() || *prefix == self.native_prefix {
                return Err(ConfigError::ChannelPrefix(prefix.clone()));
            }
            if record.source_channel.is_empty() {
                return Err(ConfigError::EmptyChannelId(prefix.clone()));
            }
        }
        for denom in &self.send_disabled {
            validate_denom(denom).map_err(ConfigError::Denom)?;
        }
        for address in &self.blocked {
            parse_address(address)?;
        }
        self.parsed_balances()?;
        Ok(())
    }

    /// Decoded blocklist.
    pub fn blocked_addresses(&self) -> Result<Vec<Address>, ConfigError> {
        self.blocked.iter().map(|a| parse_address(a)).collect()
    }

    /// Decoded starting balances.
    pub fn parsed_balances(&self) -> Result<Vec<(Address, CoinSet)>, ConfigError> {
        self.balances
            .iter()
            .map(|(address, coins)| {
                let owner = parse_address(address)?;
                let coins = coins.parse::<CoinSet>().map_err(|source| ConfigError::Balance {
                    address: address.clone(),
                    source,
                })?;
                Ok((owner, coins))
            })
            .collect()
    }
}

fn parse_address(address: &str) -> Result<Address, ConfigError> {
    Address::from_bech32(address).map_err(|source| ConfigError::Address {
        address: address.to_string(),
        source,
    })
}
