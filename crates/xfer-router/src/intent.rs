//! # Messages
//!
//! The inbound send messages and the outbound forwarding request. All are
//! request-scoped values: built at the start of a call, dropped at its end.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xfer_core::{Address, AddressError, Coin, CoinError, CoinSet, Height};

/// A single send: move `amount` from `sender` to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferIntent {
    /// Sender address (bech32).
    pub sender: String,
    /// Recipient address (bech32); its prefix decides the route.
    pub recipient: String,
    /// Coins to move.
    pub amount: CoinSet,
}

impl TransferIntent {
    /// Create a send intent.
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: CoinSet) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}

/// One debited account of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Debited address (bech32).
    pub address: String,
    /// Coins debited.
    pub coins: CoinSet,
}

/// One credited account of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Credited address (bech32).
    pub address: String,
    /// Coins credited.
    pub coins: CoinSet,
}

impl Input {
    /// Create a batch input.
    pub fn new(address: impl Into<String>, coins: CoinSet) -> Self {
        Self {
            address: address.into(),
            coins,
        }
    }
}

impl Output {
    /// Create a batch output.
    pub fn new(address: impl Into<String>, coins: CoinSet) -> Self {
        Self {
            address: address.into(),
            coins,
        }
    }
}

/// Which half of a batch an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A debited entry.
    Input,
    /// A credited entry.
    Output,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Stateless validation failure of a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The batch has no inputs.
    #[error("batch has no inputs")]
    NoInputs,

    /// The batch has no outputs.
    #[error("batch has no outputs")]
    NoOutputs,

    /// An entry's address does not decode.
    #[error("{side} #{index} has invalid address: {source}")]
    InvalidAddress {
        /// Input or output.
        side: Side,
        /// Position within its side.
        index: usize,
        /// Decode failure.
        source: AddressError,
    },

    /// An entry carries no coins, or a zero amount.
    #[error("{side} #{index} must carry positive coins")]
    NonPositiveCoins {
        /// Input or output.
        side: Side,
        /// Position within its side.
        index: usize,
    },

    /// Summing one side overflowed.
    #[error("batch total: {0}")]
    Total(#[from] CoinError),

    /// Inputs and outputs carry different totals.
    #[error("sum inputs {inputs} != sum outputs {outputs}")]
    Unbalanced {
        /// Summed inputs.
        inputs: CoinSet,
        /// Summed outputs.
        outputs: CoinSet,
    },
}

/// A multi-input/multi-output local send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTransfer {
    /// Debited accounts.
    pub inputs: Vec<Input>,
    /// Credited accounts.
    pub outputs: Vec<Output>,
}

impl BatchTransfer {
    /// Create a batch.
    pub fn new(inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        Self { inputs, outputs }
    }

    /// Summed input coins.
    pub fn total_in(&self) -> Result<CoinSet, CoinError> {
        self.inputs
            .iter()
            .try_fold(CoinSet::empty(), |acc, input| acc.checked_add(&input.coins))
    }

    /// Summed output coins.
    pub fn total_out(&self) -> Result<CoinSet, CoinError> {
        self.outputs
            .iter()
            .try_fold(CoinSet::empty(), |acc, output| acc.checked_add(&output.coins))
    }

    /// Stateless checks a batch must pass before it reaches the validator:
    /// both sides non-empty, every address decodes, every entry carries
    /// positive coins, and inputs balance outputs per denomination.
    pub fn validate_basic(&self) -> Result<(), BatchError> {
        if self.inputs.is_empty() {
            return Err(BatchError::NoInputs);
        }
        if self.outputs.is_empty() {
            return Err(BatchError::NoOutputs);
        }
        let entries = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, e)| (Side::Input, i, &e.address, &e.coins))
            .chain(
                self.outputs
                    .iter()
                    .enumerate()
                    .map(|(i, e)| (Side::Output, i, &e.address, &e.coins)),
            );
        for (side, index, address, coins) in entries {
            Address::from_bech32(address)
                .map_err(|source| BatchError::InvalidAddress { side, index, source })?;
            if coins.is_empty() || coins.has_zero() {
                return Err(BatchError::NonPositiveCoins { side, index });
            }
        }
        let inputs = self.total_in()?;
        let outputs = self.total_out()?;
        if !inputs.same_totals(&outputs) {
            return Err(BatchError::Unbalanced { inputs, outputs });
        }
        Ok(())
    }
}

/// A single-denomination cross-chain transfer, built by the router and
/// consumed by the forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingRequest {
    /// Outbound port.
    pub source_port: String,
    /// Outbound channel.
    pub source_channel: String,
    /// The one coin being forwarded.
    pub token: Coin,
    /// Sender, re-encoded with its decoded prefix.
    pub sender: String,
    /// Recipient exactly as given in the send.
    pub receiver: String,
    /// Remote height after which the transfer expires.
    pub timeout_height: Height,
    /// Wall-clock timeout; always zero (height-based expiry only).
    pub timeout_timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "abc1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5nyp56l";
    const B: &str = "abc1z5tpwxqergd3c8g7ruszzg3rysjjvfegyp46jf";
    const C: &str = "abc1424242424242424242424242424242423ck78l";

    fn coins(s: &str) -> CoinSet {
        s.parse().unwrap()
    }

    #[test]
    fn test_validate_basic_accepts_balanced_batch() {
        let batch = BatchTransfer::new(
            vec![Input::new(A, coins("10uabc,4uxyz"))],
            vec![Output::new(B, coins("6uabc")), Output::new(C, coins("4uxyz,4uabc"))],
        );
        assert_eq!(batch.validate_basic(), Ok(()));
        assert_eq!(batch.total_out().unwrap().to_string(), "10uabc,4uxyz");
    }

    #[test]
    fn test_validate_basic_rejects_empty_sides() {
        let no_inputs = BatchTransfer::new(vec![], vec![Output::new(B, coins("1uabc"))]);
        assert_eq!(no_inputs.validate_basic(), Err(BatchError::NoInputs));
        let no_outputs = BatchTransfer::new(vec![Input::new(A, coins("1uabc"))], vec![]);
        assert_eq!(no_outputs.validate_basic(), Err(BatchError::NoOutputs));
    }

    #[test]
    fn test_validate_basic_rejects_bad_output_address() {
        let batch = BatchTransfer::new(
            vec![Input::new(A, coins("1uabc"))],
            vec![Output::new("abc1nope", coins("1uabc"))],
        );
        assert!(matches!(
            batch.validate_basic(),
            Err(BatchError::InvalidAddress { side: Side::Output, index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_basic_rejects_zero_coins() {
        let batch = BatchTransfer::new(
            vec![Input::new(A, coins("0uabc"))],
            vec![Output::new(B, coins("0uabc"))],
        );
        assert_eq!(
            batch.validate_basic(),
            Err(BatchError::NonPositiveCoins { side: Side::Input, index: 0 })
        );
    }

    #[test]
    fn test_validate_basic_rejects_unbalanced() {
        let batch = BatchTransfer::new(
            vec![Input::new(A, coins("10uabc"))],
            vec![Output::new(B, coins("9uabc"))],
        );
        assert!(matches!(batch.validate_basic(), Err(BatchError::Unbalanced { .. })));
    }
}
