//! # Network Assembly
//!
//! Loads a [`NetworkConfig`] and wires the in-memory collaborators into a
//! router. One [`Network`] lives for one CLI invocation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use xfer_router::{
    InMemoryBank, InMemoryForwarder, InMemoryRegistry, NetworkConfig, TransferRouter, TxContext,
};

use crate::report::TransferReport;

/// Router over the in-memory collaborators.
pub type LocalRouter = TransferRouter<InMemoryRegistry, Arc<InMemoryBank>, Arc<InMemoryForwarder>>;

/// A router plus handles on the state it mutates.
#[derive(Debug)]
pub struct Network {
    chain_id: String,
    router: LocalRouter,
    bank: Arc<InMemoryBank>,
    forwarder: Arc<InMemoryForwarder>,
}

impl Network {
    /// Load and assemble the network described at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let config = NetworkConfig::load(path)
            .with_context(|| format!("loading network {}", path.display()))?;
        Self::from_config(&config)
    }

    /// Assemble from an already validated configuration.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        let bank = Arc::new(InMemoryBank::from_config(config)?);
        let forwarder = Arc::new(InMemoryForwarder::from_config(Arc::clone(&bank), config));
        let router = TransferRouter::new(
            InMemoryRegistry::from_config(config),
            Arc::clone(&bank),
            Arc::clone(&forwarder),
        );
        Ok(Self {
            chain_id: format!("{}-local", config.native_prefix),
            router,
            bank,
            forwarder,
        })
    }

    /// The assembled router.
    pub fn router(&self) -> &LocalRouter {
        &self.router
    }

    /// A fresh transaction context at `height`.
    pub fn context(&self, height: u64) -> TxContext {
        TxContext::new(self.chain_id.clone(), height)
    }

    /// Snapshot the network state after a call.
    pub fn report(&self, ctx: &TxContext, error: Option<String>) -> TransferReport {
        TransferReport::new(
            error,
            ctx.events().to_vec(),
            self.forwarder.submitted(),
            self.bank.balances(),
            self.forwarder.escrow_accounts(),
        )
    }
}
