//! # xfer-router: Prefix-Routed Transfers
//!
//! Intercepts a ledger's native send and decides, per recipient address,
//! whether the value settles locally or is forwarded over a cross-chain
//! channel:
//!
//! - **Router** ([`router`]): [`TransferRouter`] compares the recipient's
//!   bech32 prefix with the native prefix. Equal prefixes settle through the
//!   [`LocalTransferExecutor`]; foreign prefixes are looked up in the
//!   [`PrefixRegistry`] and turned into a single-denomination
//!   [`ForwardingRequest`] whose timeout is the remote light-client height
//!   plus the channel's offset, submitted to the [`RemoteForwarder`].
//!
//! - **Batch** ([`batch`]): [`BatchTransferValidator`] enforces send policy
//!   and the recipient blocklist over a multi-input/multi-output batch
//!   before delegating it to the ledger. Batches never leave the chain.
//!
//! - **Collaborators** ([`traits`]): narrow interfaces to the registry, the
//!   ledger and the forwarder. Every call receives the host's [`TxContext`]
//!   explicitly.
//!
//! - **Reference collaborators** ([`memory`]): thread-safe in-memory
//!   implementations, built from a YAML [`NetworkConfig`] ([`config`]).
//!
//! ## Crate Policy
//!
//! - The routing core takes no locks and keeps no state between calls.
//! - The routing core does not log; every failure is returned verbatim.
//! - Metrics are best-effort and never change the outcome.

pub mod batch;
pub mod config;
pub mod context;
pub mod error;
pub mod intent;
pub mod memory;
pub mod router;
pub mod telemetry;
pub mod traits;

#[cfg(test)]
pub(crate) mod testkit;

// Re-export primary types.
pub use batch::BatchTransferValidator;
pub use config::{ConfigError, NetworkConfig, RemoteHeight};
pub use context::{Event, EventAttribute, TxContext};
pub use error::{AddressRole, RouteError, RouteOutcome};
pub use intent::{BatchError, BatchTransfer, ForwardingRequest, Input, Output, Side, TransferIntent};
pub use memory::{InMemoryBank, InMemoryForwarder, InMemoryRegistry};
pub use router::{SendHandler, TransferRouter};
pub use traits::{
    ChannelQueryError, ForwardingError, LedgerError, LocalTransferExecutor, PrefixRegistry,
    RemoteForwarder, DEFAULT_TRANSFER_PORT,
};
