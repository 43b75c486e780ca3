//! # Routing Errors
//!
//! Every way a send or batch send can fail. All variants are recoverable
//! and returned to the caller unchanged; nothing is retried here.

use thiserror::Error;
use xfer_core::{AddressError, Height};

use crate::traits::{ChannelQueryError, ForwardingError, LedgerError};

/// Outcome of one routing call. Success carries no payload.
pub type RouteOutcome = Result<(), RouteError>;

/// Which address of a message failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
    /// The sending account of a single send.
    Sender,
    /// The receiving account of a single send.
    Recipient,
    /// The output at this position in a batch.
    Output(usize),
}

impl std::fmt::Display for AddressRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sender => f.write_str("sender"),
            Self::Recipient => f.write_str("recipient"),
            Self::Output(index) => write!(f, "output #{index}"),
        }
    }
}

/// Errors returned by [`SendHandler`](crate::SendHandler) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A coin's denomination is not allowed to be sent.
    #[error("{denom} transfers are currently disabled")]
    SendDisabled {
        /// The disabled denomination.
        denom: String,
    },

    /// An address failed to decode.
    #[error("invalid {role} address {address:?}: {source}")]
    InvalidAddress {
        /// Which address failed.
        role: AddressRole,
        /// The address as given.
        address: String,
        /// Decode failure.
        source: AddressError,
    },

    /// The recipient is on the blocklist.
    #[error("{address} is not allowed to receive funds")]
    RecipientBlocked {
        /// The blocked recipient.
        address: String,
    },

    /// No outbound channel is registered for the recipient's prefix.
    #[error("no channel registered for address prefix {prefix:?}")]
    UnknownDestination {
        /// The foreign prefix.
        prefix: String,
    },

    /// A forwarded send carries no coins.
    #[error("invalid send amount: no coins")]
    EmptyAmount,

    /// A forwarded send carries more than one denomination.
    #[error("cannot forward {count} denominations in one cross-chain transfer")]
    MultiDenomUnsupported {
        /// Number of denominations in the send.
        count: usize,
    },

    /// The channel's remote light-client height could not be read.
    #[error("channel {port}/{channel} unavailable: {source}")]
    ChannelUnavailable {
        /// Outbound port.
        port: String,
        /// Outbound channel.
        channel: String,
        /// Query failure.
        source: ChannelQueryError,
    },

    /// Adding the channel's offset to the remote height overflowed.
    #[error("timeout height overflow: {latest} + {offset} blocks")]
    TimeoutOverflow {
        /// Latest remote height.
        latest: Height,
        /// Channel timeout offset.
        offset: u64,
    },

    /// The local ledger rejected the transfer.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The forwarder rejected the request.
    #[error(transparent)]
    Forwarding(#[from] ForwardingError),
}

impl RouteError {
    pub(crate) fn invalid_address(role: AddressRole, address: &str, source: AddressError) -> Self {
        Self::InvalidAddress {
            role,
            address: address.to_string(),
            source,
        }
    }
}
