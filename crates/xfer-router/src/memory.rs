//! # In-Memory Collaborators
//!
//! Thread-safe reference implementations of [`PrefixRegistry`],
//! [`LocalTransferExecutor`] and [`RemoteForwarder`], used by the test
//! suites and the `xfer` binary. State lives behind `parking_lot` locks,
//! which never poison; no lock is held past a single method call.
//!
//! These are deliberately small. The bank keeps plain balances with no
//! supply tracking or account model, and the forwarder stops at escrow:
//! nothing is relayed.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use xfer_core::{Address, Amount, ChannelRecord, Coin, CoinSet, Height};

use crate::config::{ConfigError, NetworkConfig};
use crate::context::TxContext;
use crate::intent::{ForwardingRequest, Input, Output};
use crate::traits::{
    ChannelQueryError, ForwardingError, LedgerError, LocalTransferExecutor, PrefixRegistry,
    RemoteForwarder, DEFAULT_TRANSFER_PORT,
};

type Holdings = BTreeMap<String, Amount>;

// -- Registry -----------------------------------------------------------------

/// Prefix registry with a fixed channel map and settable light-client heights.
#[derive(Debug)]
pub struct InMemoryRegistry {
    native_prefix: String,
    channels: BTreeMap<String, ChannelRecord>,
    heights: RwLock<BTreeMap<(String, String), Height>>,
}

impl InMemoryRegistry {
    /// A registry that knows only its native prefix.
    pub fn new(native_prefix: impl Into<String>) -> Self {
        Self {
            native_prefix: native_prefix.into(),
            channels: BTreeMap::new(),
            heights: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register the outbound channel for a foreign prefix.
    pub fn with_channel(mut self, prefix: impl Into<String>, record: ChannelRecord) -> Self {
        self.channels.insert(prefix.into(), record);
        self
    }

    /// Record the latest verified height behind `port`/`channel`.
    pub fn set_latest_height(&self, port: &str, channel: &str, height: Height) {
        self.heights
            .write()
            .insert((port.to_string(), channel.to_string()), height);
    }

    /// Build from a validated configuration.
    pub fn from_config(config: &NetworkConfig) -> Self {
        let registry = Self {
            native_prefix: config.native_prefix.clone(),
            channels: config.channels.clone(),
            heights: RwLock::new(BTreeMap::new()),
        };
        for remote in &config.remote_heights {
            registry.set_latest_height(&remote.port, &remote.channel, remote.height);
        }
        registry
    }
}

impl PrefixRegistry for InMemoryRegistry {
    fn native_prefix(&self, _ctx: &TxContext) -> String {
        self.native_prefix.clone()
    }

    fn channel_for(&self, _ctx: &TxContext, prefix: &str) -> Option<ChannelRecord> {
        self.channels.get(prefix).cloned()
    }

    fn latest_height(
        &self,
        _ctx: &TxContext,
        port: &str,
        channel: &str,
    ) -> Result<Height, ChannelQueryError> {
        self.heights
            .read()
            .get(&(port.to_string(), channel.to_string()))
            .copied()
            .ok_or_else(|| ChannelQueryError::ClientNotFound {
                port: port.to_string(),
                channel: channel.to_string(),
            })
    }
}

// -- Bank ---------------------------------------------------------------------

/// Balance-keeping ledger with a blocklist and per-denomination send switch.
///
/// Every mutation stages its changes on copies of the touched accounts and
/// commits only if all of them succeed, under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    balances: RwLock<BTreeMap<Address, Holdings>>,
    blocked: RwLock<BTreeSet<Address>>,
    send_disabled: RwLock<BTreeSet<String>>,
}

impl InMemoryBank {
    /// An empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a validated configuration.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, ConfigError> {
        let bank = Self::new();
        for (owner, coins) in config.parsed_balances()? {
            bank.set_balance(&owner, &coins);
        }
        for address in config.blocked_addresses()? {
            bank.block(address);
        }
        for denom in &config.send_disabled {
            bank.disable_send(denom.clone());
        }
        Ok(bank)
    }

    /// Current holdings of `owner`, sorted by denomination.
    pub fn balance(&self, owner: &Address) -> CoinSet {
        self.balances
            .read()
            .get(owner)
            .map(holdings_to_coins)
            .unwrap_or_default()
    }

    /// Every non-empty account.
    pub fn balances(&self) -> BTreeMap<Address, CoinSet> {
        self.balances
            .read()
            .iter()
            .filter(|(_, holdings)| !holdings.is_empty())
            .map(|(owner, holdings)| (owner.clone(), holdings_to_coins(holdings)))
            .collect()
    }

    /// Replace the holdings of `owner`.
    pub fn set_balance(&self, owner: &Address, coins: &CoinSet) {
        let holdings: Holdings = coins
            .iter()
            .filter(|c| !c.amount().is_zero())
            .map(|c| (c.denom().to_string(), c.amount()))
            .collect();
        self.balances.write().insert(owner.clone(), holdings);
    }

    /// Add `coins` to `owner`.
    pub fn credit(&self, owner: &Address, coins: &CoinSet) -> Result<(), LedgerError> {
        self.apply(&[], &[(owner, coins)])
    }

    /// Remove `coins` from `owner`.
    pub fn debit(&self, owner: &Address, coins: &CoinSet) -> Result<(), LedgerError> {
        self.apply(&[(owner, coins)], &[])
    }

    /// Bar `address` from receiving funds.
    pub fn block(&self, address: Address) {
        self.blocked.write().insert(address);
    }

    /// Disable sends of `denom`.
    pub fn disable_send(&self, denom: impl Into<String>) {
        self.send_disabled.write().insert(denom.into());
    }

    fn apply(
        &self,
        debits: &[(&Address, &CoinSet)],
        credits: &[(&Address, &CoinSet)],
    ) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let mut staged: BTreeMap<Address, Holdings> = BTreeMap::new();

        for (owner, coins) in debits {
            let holdings = staged
                .entry((*owner).clone())
                .or_insert_with(|| balances.get(*owner).cloned().unwrap_or_default());
            for coin in coins.iter() {
                let available = holdings.get(coin.denom()).copied().unwrap_or_default();
                let remaining = available.checked_sub(coin.amount()).ok_or_else(|| {
                    LedgerError::InsufficientFunds {
                        address: owner.to_string(),
                        denom: coin.denom().to_string(),
                        available,
                        required: coin.amount(),
                    }
                })?;
                if remaining.is_zero() {
                    holdings.remove(coin.denom());
                } else {
                    holdings.insert(coin.denom().to_string(), remaining);
                }
            }
        }

        for (owner, coins) in credits {
            let holdings = staged
                .entry((*owner).clone())
                .or_insert_with(|| balances.get(*owner).cloned().unwrap_or_default());
            for coin in coins.iter().filter(|c| !c.amount().is_zero()) {
                let held = holdings.entry(coin.denom().to_string()).or_default();
                *held = held.checked_add(coin.amount()).ok_or_else(|| LedgerError::Overflow {
                    address: owner.to_string(),
                    denom: coin.denom().to_string(),
                })?;
            }
        }

        balances.extend(staged);
        Ok(())
    }
}

fn holdings_to_coins(holdings: &Holdings) -> CoinSet {
    let coins = holdings
        .iter()
        .filter_map(|(denom, amount)| Coin::new(denom.clone(), *amount).ok())
        .collect();
    CoinSet::new(coins).unwrap_or_default()
}

fn decode(address: &str) -> Result<Address, LedgerError> {
    Address::from_bech32(address).map_err(|source| LedgerError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}

fn total<'a>(
    mut entries: impl Iterator<Item = (&'a str, &'a CoinSet)>,
) -> Result<CoinSet, LedgerError> {
    entries.try_fold(CoinSet::empty(), |acc, (address, coins)| {
        acc.checked_add(coins).map_err(|_| LedgerError::Overflow {
            address: address.to_string(),
            denom: coins
                .iter()
                .map(|c| c.denom())
                .collect::<Vec<_>>()
                .join(","),
        })
    })
}

impl LocalTransferExecutor for InMemoryBank {
    fn is_send_enabled(&self, _ctx: &TxContext, coin: &Coin) -> bool {
        !self.send_disabled.read().contains(coin.denom())
    }

    fn is_blocked(&self, _ctx: &TxContext, address: &Address) -> bool {
        self.blocked.read().contains(address)
    }

    fn transfer(
        &self,
        ctx: &mut TxContext,
        from: &Address,
        to: &Address,
        amount: &CoinSet,
    ) -> Result<(), LedgerError> {
        self.apply(&[(from, amount)], &[(to, amount)])?;
        tracing::debug!(
            chain_id = %ctx.chain_id(),
            from = %from,
            to = %to,
            amount = %amount,
            "bank transfer"
        );
        Ok(())
    }

    fn batch_transfer(
        &self,
        ctx: &mut TxContext,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<(), LedgerError> {
        let total_in = total(inputs.iter().map(|i| (i.address.as_str(), &i.coins)))?;
        let total_out = total(outputs.iter().map(|o| (o.address.as_str(), &o.coins)))?;
        if !total_in.same_totals(&total_out) {
            return Err(LedgerError::Unbalanced {
                inputs: total_in,
                outputs: total_out,
            });
        }

        let debits = inputs
            .iter()
            .map(|i| Ok((decode(&i.address)?, &i.coins)))
            .collect::<Result<Vec<_>, LedgerError>>()?;
        let credits = outputs
            .iter()
            .map(|o| Ok((decode(&o.address)?, &o.coins)))
            .collect::<Result<Vec<_>, LedgerError>>()?;

        let debits: Vec<_> = debits.iter().map(|(a, c)| (a, *c)).collect();
        let credits: Vec<_> = credits.iter().map(|(a, c)| (a, *c)).collect();
        self.apply(&debits, &credits)?;
        tracing::debug!(
            chain_id = %ctx.chain_id(),
            inputs = inputs.len(),
            outputs = outputs.len(),
            total = %total_in,
            "bank batch transfer"
        );
        Ok(())
    }
}

// -- Forwarder ----------------------------------------------------------------

/// Forwarder that escrows the forwarded coin out of the sender's bank
/// balance and records every accepted request.
#[derive(Debug)]
pub struct InMemoryForwarder {
    bank: Arc<InMemoryBank>,
    port: String,
    escrow: Mutex<BTreeMap<(String, String), Holdings>>,
    closed: RwLock<BTreeSet<(String, String)>>,
    submitted: Mutex<Vec<ForwardingRequest>>,
}

impl InMemoryForwarder {
    /// A forwarder on the default transfer port, escrowing out of `bank`.
    pub fn new(bank: Arc<InMemoryBank>) -> Self {
        Self::with_port(bank, DEFAULT_TRANSFER_PORT)
    }

    /// A forwarder on `port`.
    pub fn with_port(bank: Arc<InMemoryBank>, port: impl Into<String>) -> Self {
        Self {
            bank,
            port: port.into(),
            escrow: Mutex::new(BTreeMap::new()),
            closed: RwLock::new(BTreeSet::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Build from a validated configuration.
    pub fn from_config(bank: Arc<InMemoryBank>, config: &NetworkConfig) -> Self {
        Self::with_port(bank, config.transfer_port.clone())
    }

    /// Refuse further packets on `port`/`channel`.
    pub fn close_channel(&self, port: &str, channel: &str) {
        self.closed
            .write()
            .insert((port.to_string(), channel.to_string()));
    }

    /// Value held in escrow for `port`/`channel`.
    pub fn escrowed(&self, port: &str, channel: &str) -> CoinSet {
        self.escrow
            .lock()
            .get(&(port.to_string(), channel.to_string()))
            .map(holdings_to_coins)
            .unwrap_or_default()
    }

    /// Every non-empty escrow account.
    pub fn escrow_accounts(&self) -> BTreeMap<(String, String), CoinSet> {
        self.escrow
            .lock()
            .iter()
            .map(|(key, holdings)| (key.clone(), holdings_to_coins(holdings)))
            .collect()
    }

    /// Accepted requests, oldest first.
    pub fn submitted(&self) -> Vec<ForwardingRequest> {
        self.submitted.lock().clone()
    }
}

impl RemoteForwarder for InMemoryForwarder {
    fn port(&self, _ctx: &TxContext) -> String {
        self.port.clone()
    }

    fn submit(&self, ctx: &mut TxContext, request: ForwardingRequest) -> Result<(), ForwardingError> {
        let key = (request.source_port.clone(), request.source_channel.clone());
        if self.closed.read().contains(&key) {
            return Err(ForwardingError::ChannelClosed {
                port: key.0,
                channel: key.1,
            });
        }
        let sender = Address::from_bech32(&request.sender)
            .map_err(|_| ForwardingError::InvalidSender(request.sender.clone()))?;

        // Lock order: the bank lock is released before the escrow lock is
        // taken. The two are never held together.
        let token = &request.token;
        let debited = CoinSet::single(token.clone());
        self.bank.debit(&sender, &debited)?;

        let mut escrow = self.escrow.lock();
        let held = escrow
            .get(&key)
            .and_then(|h| h.get(token.denom()))
            .copied()
            .unwrap_or_default();
        let Some(escrowed) = held.checked_add(token.amount()) else {
            drop(escrow);
            self.bank.credit(&sender, &debited)?;
            return Err(LedgerError::Overflow {
                address: format!("escrow:{}/{}", key.0, key.1),
                denom: token.denom().to_string(),
            }
            .into());
        };
        escrow
            .entry(key)
            .or_default()
            .insert(token.denom().to_string(), escrowed);
        drop(escrow);

        tracing::debug!(
            chain_id = %ctx.chain_id(),
            port = %request.source_port,
            channel = %request.source_channel,
            token = %request.token,
            receiver = %request.receiver,
            timeout = %request.timeout_height,
            "forwarding request escrowed"
        );
        self.submitted.lock().push(request);
        Ok(())
    }
}
