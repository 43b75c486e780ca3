//! # Collaborator Traits
//!
//! The three external services the router reaches through narrow
//! interfaces. Implementations own their state and any locking; the router
//! holds no references past a single call.
//!
//! All traits require `Send + Sync` so one router can serve concurrent
//! requests, each with its own [`TxContext`].

use std::sync::Arc;

use thiserror::Error;
use xfer_core::{Address, AddressError, Amount, ChannelRecord, Coin, CoinSet, Height};

use crate::context::TxContext;
use crate::intent::{ForwardingRequest, Input, Output};

/// Port used for outbound transfers when a forwarder does not name one.
pub const DEFAULT_TRANSFER_PORT: &str = "transfer";

/// Failure querying a channel's remote light client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelQueryError {
    /// No channel or client is registered for the port/channel pair.
    #[error("no light client for {port}/{channel}")]
    ClientNotFound {
        /// Outbound port.
        port: String,
        /// Outbound channel.
        channel: String,
    },

    /// The client exists but cannot serve a height.
    #[error("light client for {port}/{channel} unavailable: {reason}")]
    Unavailable {
        /// Outbound port.
        port: String,
        /// Outbound channel.
        channel: String,
        /// Why the client cannot be used.
        reason: String,
    },
}

/// Failure inside the local ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An account does not hold enough of a denomination.
    #[error("insufficient funds: {address} has {available}{denom}, needs {required}{denom}")]
    InsufficientFunds {
        /// Account being debited.
        address: String,
        /// Denomination short.
        denom: String,
        /// Balance held.
        available: Amount,
        /// Amount requested.
        required: Amount,
    },

    /// Batch inputs and outputs do not carry the same totals.
    #[error("batch inputs {inputs} do not match outputs {outputs}")]
    Unbalanced {
        /// Summed inputs.
        inputs: CoinSet,
        /// Summed outputs.
        outputs: CoinSet,
    },

    /// An address handed to the ledger does not decode.
    #[error("invalid ledger address {address:?}: {source}")]
    InvalidAddress {
        /// The offending address string.
        address: String,
        /// Decode failure.
        source: AddressError,
    },

    /// Crediting would overflow an account balance.
    #[error("balance overflow for {address} in {denom}")]
    Overflow {
        /// Account being credited.
        address: String,
        /// Denomination that overflowed.
        denom: String,
    },
}

/// Failure submitting a forwarding request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForwardingError {
    /// The request's sender is not a valid address.
    #[error("invalid forwarding sender {0:?}")]
    InvalidSender(String),

    /// Moving the value into escrow failed.
    #[error("escrow failed: {0}")]
    Escrow(#[from] LedgerError),

    /// The outbound channel does not accept packets.
    #[error("channel {port}/{channel} is closed")]
    ChannelClosed {
        /// Outbound port.
        port: String,
        /// Outbound channel.
        channel: String,
    },
}

/// Maps address prefixes to the native chain and to outbound channels.
pub trait PrefixRegistry: Send + Sync {
    /// The prefix of addresses that settle on this chain.
    fn native_prefix(&self, ctx: &TxContext) -> String;

    /// The outbound channel registered for a foreign prefix.
    fn channel_for(&self, ctx: &TxContext, prefix: &str) -> Option<ChannelRecord>;

    /// Latest verified height of the light client behind `port`/`channel`.
    fn latest_height(
        &self,
        ctx: &TxContext,
        port: &str,
        channel: &str,
    ) -> Result<Height, ChannelQueryError>;
}

/// The local ledger: send policy, blocklist, and balance-conserving moves.
pub trait LocalTransferExecutor: Send + Sync {
    /// Whether `coin`'s denomination may be sent.
    fn is_send_enabled(&self, ctx: &TxContext, coin: &Coin) -> bool;

    /// Whether `address` is barred from receiving funds.
    fn is_blocked(&self, ctx: &TxContext, address: &Address) -> bool;

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &self,
        ctx: &mut TxContext,
        from: &Address,
        to: &Address,
        amount: &CoinSet,
    ) -> Result<(), LedgerError>;

    /// Apply a multi-input/multi-output transfer.
    fn batch_transfer(
        &self,
        ctx: &mut TxContext,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<(), LedgerError>;
}

/// Hands forwarding requests to the interoperability protocol.
pub trait RemoteForwarder: Send + Sync {
    /// Port outbound transfers are sent from.
    fn port(&self, _ctx: &TxContext) -> String {
        DEFAULT_TRANSFER_PORT.to_string()
    }

    /// Queue `request` for delivery. Consumes the request.
    fn submit(&self, ctx: &mut TxContext, request: ForwardingRequest) -> Result<(), ForwardingError>;
}

impl<T: PrefixRegistry + ?Sized> PrefixRegistry for Arc<T> {
    fn native_prefix(&self, ctx: &TxContext) -> String {
        (**self).native_prefix(ctx)
    }

    fn channel_for(&self, ctx: &TxContext, prefix: &str) -> Option<ChannelRecord> {
        (**self).channel_for(ctx, prefix)
    }

    fn latest_height(
        &self,
        ctx: &TxContext,
        port: &str,
        channel: &str,
    ) -> Result<Height, ChannelQueryError> {
        (**self).latest_height(ctx, port, channel)
    }
}

impl<T: LocalTransferExecutor + ?Sized> LocalTransferExecutor for Arc<T> {
    fn is_send_enabled(&self, ctx: &TxContext, coin: &Coin) -> bool {
        (**self).is_send_enabled(ctx, coin)
    }

    fn is_blocked(&self, ctx: &TxContext, address: &Address) -> bool {
        (**self).is_blocked(ctx, address)
    }

    fn transfer(
        &self,
        ctx: &mut TxContext,
        from: &Address,
        to: &Address,
        amount: &CoinSet,
    ) -> Result<(), LedgerError> {
        (**self).transfer(ctx, from, to, amount)
    }

    fn batch_transfer(
        &self,
        ctx: &mut TxContext,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<(), LedgerError> {
        (**self).batch_transfer(ctx, inputs, outputs)
    }
}

impl<T: RemoteForwarder + ?Sized> RemoteForwarder for Arc<T> {
    fn port(&self, ctx: &TxContext) -> String {
        (**self).port(ctx)
    }

    fn submit(&self, ctx: &mut TxContext, request: ForwardingRequest) -> Result<(), ForwardingError> {
        (**self).submit(ctx, request)
    }
}
