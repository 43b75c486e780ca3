//! JSON report printed by `send` and `multi-send`.

use std::collections::BTreeMap;

use serde::Serialize;
use xfer_core::{Address, CoinSet};
use xfer_router::{Event, ForwardingRequest};

/// Whether the call succeeded, and why not.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Outcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Coins held in escrow for one outbound channel.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EscrowEntry {
    pub port: String,
    pub channel: String,
    pub coins: CoinSet,
}

/// Network state after a call.
#[derive(Debug, Serialize)]
pub struct TransferReport {
    pub outcome: Outcome,
    pub events: Vec<Event>,
    pub forwarded: Vec<ForwardingRequest>,
    pub balances: BTreeMap<String, CoinSet>,
    pub escrow: Vec<EscrowEntry>,
}

impl TransferReport {
    /// Assemble a report.
    pub fn new(
        error: Option<String>,
        events: Vec<Event>,
        forwarded: Vec<ForwardingRequest>,
        balances: BTreeMap<Address, CoinSet>,
        escrow: BTreeMap<(String, String), CoinSet>,
    ) -> Self {
        Self {
            outcome: Outcome {
                ok: error.is_none(),
                error,
            },
            events,
            forwarded,
            balances: balances
                .into_iter()
                .map(|(owner, coins)| (owner.to_string(), coins))
                .collect(),
            escrow: escrow
                .into_iter()
                .map(|((port, channel), coins)| EscrowEntry {
                    port,
                    channel,
                    coins,
                })
                .collect(),
        }
    }

    /// Process exit code for this report.
    pub fn exit_code(&self) -> u8 {
        if self.outcome.ok {
            0
        } else {
            2
        }
    }
}
