//! Recording test doubles for the collaborator traits.

use std::collections::HashMap;

use parking_lot::Mutex;
use xfer_core::{Address, ChannelRecord, Coin, CoinSet, Height};

use crate::context::TxContext;
use crate::intent::{ForwardingRequest, Input, Output};
use crate::router::TransferRouter;
use crate::traits::{
    ChannelQueryError, ForwardingError, LedgerError, LocalTransferExecutor, PrefixRegistry,
    RemoteForwarder,
};

pub const ABC_ALICE: &str = "abc1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5nyp56l";
pub const ABC_BOB: &str = "abc1z5tpwxqergd3c8g7ruszzg3rysjjvfegyp46jf";
pub const XYZ_CAROL: &str = "xyz1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5482qxe";
pub const OSMO_DAVE: &str = "osmo1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5helwsw";

pub fn addr(s: &str) -> Address {
    Address::from_bech32(s).unwrap()
}

/// Native `abc`; `xyz` on `channel-7` with offset 1000; remote height 1-500.
pub fn standard_router() -> TransferRouter<FakeRegistry, RecordingLedger, RecordingForwarder> {
    TransferRouter::new(
        FakeRegistry::standard(),
        RecordingLedger::default(),
        RecordingForwarder::default(),
    )
}

#[derive(Debug)]
pub struct FakeRegistry {
    native: String,
    channels: HashMap<String, ChannelRecord>,
    height: Result<Height, ChannelQueryError>,
    height_queries: Mutex<Vec<(String, String)>>,
}

impl FakeRegistry {
    pub fn new(native: &str) -> Self {
        Self {
            native: native.to_string(),
            channels: HashMap::new(),
            height: Ok(Height::new(1, 500)),
            height_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn standard() -> Self {
        Self::new("abc").with_channel("xyz", ChannelRecord::new("channel-7", 1000))
    }

    pub fn with_channel(mut self, prefix: &str, record: ChannelRecord) -> Self {
        self.channels.insert(prefix.to_string(), record);
        self
    }

    pub fn with_height(mut self, height: Result<Height, ChannelQueryError>) -> Self {
        self.height = height;
        self
    }

    pub fn height_queries(&self) -> Vec<(String, String)> {
        self.height_queries.lock().clone()
    }
}

impl PrefixRegistry for FakeRegistry {
    fn native_prefix(&self, _ctx: &TxContext) -> String {
        self.native.clone()
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
        self.height_queries
            .lock()
            .push((port.to_string(), channel.to_string()));
        self.height.clone()
    }
}

#[derive(Debug, Default)]
pub struct RecordingLedger {
    blocked: Vec<Address>,
    disabled: Vec<String>,
    failure: Option<LedgerError>,
    transfers: Mutex<Vec<(Address, Address, CoinSet)>>,
    batches: Mutex<Vec<(Vec<Input>, Vec<Output>)>>,
}

impl RecordingLedger {
    pub fn with_blocked(mut self, address: Address) -> Self {
        self.blocked.push(address);
        self
    }

    pub fn with_disabled(mut self, denom: &str) -> Self {
        self.disabled.push(denom.to_string());
        self
    }

    pub fn failing(mut self, failure: LedgerError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn transfers(&self) -> Vec<(Address, Address, CoinSet)> {
        self.transfers.lock().clone()
    }

    pub fn batches(&self) -> Vec<(Vec<Input>, Vec<Output>)> {
        self.batches.lock().clone()
    }
}

impl LocalTransferExecutor for RecordingLedger {
    fn is_send_enabled(&self, _ctx: &TxContext, coin: &Coin) -> bool {
        !self.disabled.iter().any(|d| d == coin.denom())
    }

    fn is_blocked(&self, _ctx: &TxContext, address: &Address) -> bool {
        self.blocked.contains(address)
    }

    fn transfer(
        &self,
        _ctx: &mut TxContext,
        from: &Address,
        to: &Address,
        amount: &CoinSet,
    ) -> Result<(), LedgerError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.transfers
            .lock()
            .push((from.clone(), to.clone(), amount.clone()));
        Ok(())
    }

    fn batch_transfer(
        &self,
        _ctx: &mut TxContext,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<(), LedgerError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.batches.lock().push((inputs.to_vec(), outputs.to_vec()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingForwarder {
    port: Option<String>,
    failure: Option<ForwardingError>,
    submitted: Mutex<Vec<ForwardingRequest>>,
}

impl RecordingForwarder {
    pub fn with_port(port: &str) -> Self {
        Self {
            port: Some(port.to_string()),
            ..Self::default()
        }
    }

    pub fn failing(failure: ForwardingError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn submitted(&self) -> Vec<ForwardingRequest> {
        self.submitted.lock().clone()
    }
}

impl RemoteForwarder for RecordingForwarder {
    fn port(&self, _ctx: &TxContext) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| crate::traits::DEFAULT_TRANSFER_PORT.to_string())
    }

    fn submit(&self, _ctx: &mut TxContext, request: ForwardingRequest) -> Result<(), ForwardingError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.submitted.lock().push(request);
        Ok(())
    }
}
