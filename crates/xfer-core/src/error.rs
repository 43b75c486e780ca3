//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used by the foundational types. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Address errors carry the underlying bech32 failure or the violated
//!   length/prefix rule.
//! - Coin errors name the offending denomination or input text.

use thiserror::Error;

/// Top-level error type for the foundational types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XferError {
    /// Address decoding or encoding failed.
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Coin or coin set construction failed.
    #[error("coin error: {0}")]
    Coin(#[from] CoinError),
}

/// Error while decoding, encoding or constructing an address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The string is not valid bech32 (separator, charset, case or checksum).
    #[error("invalid bech32 encoding: {0}")]
    Bech32(#[from] bech32::Error),

    /// The string carries a bech32m checksum; only classic bech32 is accepted.
    #[error("unsupported checksum variant: bech32m")]
    UnsupportedVariant,

    /// The prefix is empty.
    #[error("empty address prefix")]
    EmptyPrefix,

    /// The prefix contains characters outside lowercase printable ASCII.
    #[error("invalid address prefix {0:?}: must be lowercase printable ASCII")]
    InvalidPrefix(String),

    /// The address carries no payload bytes.
    #[error("empty address bytes")]
    Empty,

    /// The address payload exceeds the maximum length.
    #[error("address length {len} exceeds maximum of {max} bytes")]
    TooLong {
        /// Actual payload length.
        len: usize,
        /// Maximum permitted payload length.
        max: usize,
    },
}

/// Error while constructing or parsing coins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    /// The denomination does not match `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
    #[error("invalid denomination: {0:?}")]
    InvalidDenom(String),

    /// The same denomination appears twice in one coin set.
    #[error("duplicate denomination: {0}")]
    DuplicateDenom(String),

    /// The amount is not a decimal integer in range.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The coin text is not of the form `<amount><denom>`.
    #[error("invalid coin expression: {0:?}")]
    InvalidCoin(String),

    /// Summing amounts overflowed.
    #[error("amount overflow for denomination {0}")]
    Overflow(String),
}
