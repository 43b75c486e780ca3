//! # Transfer Router
//!
//! Decides, per recipient, whether a send settles locally or is forwarded
//! across a cross-chain channel.
//!
//! ## Routing
//!
//! ```text
//! send-enabled? ─▶ decode sender ─▶ decode recipient prefix
//!                                         │
//!                       prefix == native? │
//!                 ┌──────── yes ──────────┴────────── no ────────┐
//!                 ▼                                              ▼
//!       full decode recipient                          channel for prefix?
//!       blocklist check                                exactly one denom?
//!       ledger.transfer                                latest remote height
//!       gauges + event                                 timeout = latest + offset
//!                                                      forwarder.submit
//! ```
//!
//! Prefix comparison is exact: no case folding, so `XYZ1...` is foreign
//! unless the native prefix is itself `XYZ`.

use xfer_core::{decode_prefix, Address, ChannelRecord, Coin, CoinSet};

use crate::batch::BatchTransferValidator;
use crate::context::{Event, TxContext};
use crate::error::{AddressRole, RouteError, RouteOutcome};
use crate::intent::{BatchTransfer, ForwardingRequest, TransferIntent};
use crate::telemetry;
use crate::traits::{LocalTransferExecutor, PrefixRegistry, RemoteForwarder};

/// The two send entry points of a ledger.
pub trait SendHandler {
    /// Route a single send locally or across a channel.
    fn route(&self, ctx: &mut TxContext, intent: &TransferIntent) -> RouteOutcome;

    /// Validate and execute a local multi-input/multi-output send.
    fn validate_and_execute(&self, ctx: &mut TxContext, batch: &BatchTransfer) -> RouteOutcome;
}

/// Routes sends by recipient prefix across three collaborators.
#[derive(Debug, Clone)]
pub struct TransferRouter<R, L, F> {
    registry: R,
    ledger: L,
    forwarder: F,
}

impl<R, L, F> TransferRouter<R, L, F>
where
    R: PrefixRegistry,
    L: LocalTransferExecutor,
    F: RemoteForwarder,
{
    /// Create a router over the given collaborators.
    pub fn new(registry: R, ledger: L, forwarder: F) -> Self {
        Self {
            registry,
            ledger,
            forwarder,
        }
    }

    /// The prefix registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The local ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The remote forwarder.
    pub fn forwarder(&self) -> &F {
        &self.forwarder
    }

    fn route_local(
        &self,
        ctx: &mut TxContext,
        from: &Address,
        intent: &TransferIntent,
    ) -> RouteOutcome {
        let to = Address::from_bech32(&intent.recipient).map_err(|source| {
            RouteError::invalid_address(AddressRole::Recipient, &intent.recipient, source)
        })?;
        if self.ledger.is_blocked(ctx, &to) {
            return Err(RouteError::RecipientBlocked {
                address: intent.recipient.clone(),
            });
        }

        self.ledger.transfer(ctx, from, &to, &intent.amount)?;

        telemetry::record_send(&intent.amount);
        ctx.emit_event(Event::message_processed());
        Ok(())
    }

    fn route_remote(
        &self,
        ctx: &mut TxContext,
        from: &Address,
        prefix: &str,
        intent: &TransferIntent,
    ) -> RouteOutcome {
        let record = self
            .registry
            .channel_for(ctx, prefix)
            .ok_or_else(|| RouteError::UnknownDestination {
                prefix: prefix.to_string(),
            })?;
        let token = single_coin(&intent.amount)?;
        let request = self.forwarding_request(ctx, from, &record, token, &intent.recipient)?;
        self.forwarder.submit(ctx, request)?;
        Ok(())
    }

    fn forwarding_request(
        &self,
        ctx: &TxContext,
        from: &Address,
        record: &ChannelRecord,
        token: &Coin,
        receiver: &str,
    ) -> Result<ForwardingRequest, RouteError> {
        let port = self.forwarder.port(ctx);
        let latest = self
            .registry
            .latest_height(ctx, &port, &record.source_channel)
            .map_err(|source| RouteError::ChannelUnavailable {
                port: port.clone(),
                channel: record.source_channel.clone(),
                source,
            })?;
        let timeout_height = latest
            .checked_add_blocks(record.timeout_height_offset)
            .ok_or(RouteError::TimeoutOverflow {
                latest,
                offset: record.timeout_height_offset,
            })?;
        let sender = from
            .to_bech32()
            .map_err(|source| RouteError::invalid_address(AddressRole::Sender, &from.to_string(), source))?;

        Ok(ForwardingRequest {
            source_port: port,
            source_channel: record.source_channel.clone(),
            token: token.clone(),
            sender,
            receiver: receiver.to_string(),
            timeout_height,
            timeout_timestamp: 0,
        })
    }
}

impl<R, L, F> SendHandler for TransferRouter<R, L, F>
where
    R: PrefixRegistry,
    L: LocalTransferExecutor,
    F: RemoteForwarder,
{
    fn route(&self, ctx: &mut TxContext, intent: &TransferIntent) -> RouteOutcome {
        ensure_send_enabled(&self.ledger, ctx, &intent.amount)?;

        let from = Address::from_bech32(&intent.sender).map_err(|source| {
            RouteError::invalid_address(AddressRole::Sender, &intent.sender, source)
        })?;
        let prefix = decode_prefix(&intent.recipient).map_err(|source| {
            RouteError::invalid_address(AddressRole::Recipient, &intent.recipient, source)
        })?;

        if prefix == self.registry.native_prefix(ctx) {
            self.route_local(ctx, &from, intent)
        } else {
            self.route_remote(ctx, &from, &prefix, intent)
        }
    }

    fn validate_and_execute(&self, ctx: &mut TxContext, batch: &BatchTransfer) -> RouteOutcome {
        BatchTransferValidator::new(&self.ledger).validate_and_execute(ctx, batch)
    }
}

/// Fails with [`RouteError::SendDisabled`] on the first coin whose
/// denomination may not be sent.
pub(crate) fn ensure_send_enabled<L: LocalTransferExecutor + ?Sized>(
    ledger: &L,
    ctx: &TxContext,
    coins: &CoinSet,
) -> RouteOutcome {
    match coins.iter().find(|coin| !ledger.is_send_enabled(ctx, coin)) {
        Some(coin) => Err(RouteError::SendDisabled {
            denom: coin.denom().to_string(),
        }),
        None => Ok(()),
    }
}

/// The one coin of a forwardable send.
fn single_coin(coins: &CoinSet) -> Result<&Coin, RouteError> {
    match coins.as_slice() {
        [] => Err(RouteError::EmptyAmount),
        [coin] => Ok(coin),
        many => Err(RouteError::MultiDenomUnsupported { count: many.len() }),
    }
}
