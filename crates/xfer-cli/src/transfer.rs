//! # Send Subcommands
//!
//! `send` routes one transfer through the router; `multi-send` runs the
//! stateless batch checks and then the batch validator. Both print a
//! [`TransferReport`] whether or not the router accepted the call.
//!
//! Exit codes: `0` accepted, `2` rejected by the router or by batch
//! validation, `1` for anything that prevented the call from running
//! (unreadable network file, unparsable arguments).

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use xfer_core::CoinSet;
use xfer_router::{BatchTransfer, Input, Output, SendHandler, TransferIntent};

use crate::network::Network;
use crate::report::TransferReport;

/// Arguments for `xfer send`.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Network description (YAML).
    #[arg(long)]
    pub network: PathBuf,

    /// Sender address.
    #[arg(long)]
    pub from: String,

    /// Recipient address; its prefix decides the route.
    #[arg(long)]
    pub to: String,

    /// Coins to send, e.g. `100uabc` or `1uabc,2uatom`.
    #[arg(long)]
    pub amount: String,

    /// Local block height the send executes at.
    #[arg(long, default_value_t = 1)]
    pub height: u64,
}

/// Arguments for `xfer multi-send`.
#[derive(Args, Debug)]
pub struct MultiSendArgs {
    /// Network description (YAML).
    #[arg(long)]
    pub network: PathBuf,

    /// Debited entry as `<address>=<coins>`. Repeatable.
    #[arg(long = "input", required = true)]
    pub inputs: Vec<String>,

    /// Credited entry as `<address>=<coins>`. Repeatable.
    #[arg(long = "output", required = true)]
    pub outputs: Vec<String>,

    /// Local block height the batch executes at.
    #[arg(long, default_value_t = 1)]
    pub height: u64,
}

/// Split `<address>=<coins>`.
pub fn parse_entry(entry: &str) -> Result<(String, CoinSet)> {
    let (address, coins) = entry
        .split_once('=')
        .ok_or_else(|| anyhow!("expected <address>=<coins>, got {entry:?}"))?;
    let coins = coins
        .parse::<CoinSet>()
        .with_context(|| format!("invalid coins in {entry:?}"))?;
    Ok((address.to_string(), coins))
}

/// Route one send on `network`.
pub fn send(network: &Network, args: &SendArgs) -> Result<TransferReport> {
    let amount = args
        .amount
        .parse::<CoinSet>()
        .with_context(|| format!("invalid amount {:?}", args.amount))?;
    let intent = TransferIntent::new(args.from.clone(), args.to.clone(), amount);
    let mut ctx = network.context(args.height);

    let error = match network.router().route(&mut ctx, &intent) {
        Ok(()) => {
            tracing::info!(from = %intent.sender, to = %intent.recipient, amount = %intent.amount, "send accepted");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "send rejected");
            Some(e.to_string())
        }
    };
    Ok(network.report(&ctx, error))
}

/// Validate and execute one batch on `network`.
pub fn multi_send(network: &Network, args: &MultiSendArgs) -> Result<TransferReport> {
    let inputs = args
        .inputs
        .iter()
        .map(|e| parse_entry(e).map(|(address, coins)| Input::new(address, coins)))
        .collect::<Result<Vec<_>>>()?;
    let outputs = args
        .outputs
        .iter()
        .map(|e| parse_entry(e).map(|(address, coins)| Output::new(address, coins)))
        .collect::<Result<Vec<_>>>()?;
    let batch = BatchTransfer::new(inputs, outputs);
    let mut ctx = network.context(args.height);

    let result = batch
        .validate_basic()
        .map_err(|e| e.to_string())
        .and_then(|()| {
            network
                .router()
                .validate_and_execute(&mut ctx, &batch)
                .map_err(|e| e.to_string())
        });
    let error = match result {
        Ok(()) => {
            tracing::info!(
                inputs = batch.inputs.len(),
                outputs = batch.outputs.len(),
                "batch accepted"
            );
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "batch rejected");
            Some(e)
        }
    };
    Ok(network.report(&ctx, error))
}

fn print(report: &TransferReport) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(report.exit_code())
}

/// Run `xfer send`.
pub fn run_send(args: &SendArgs) -> Result<u8> {
    let network = Network::load(&args.network)?;
    print(&send(&network, args)?)
}

/// Run `xfer multi-send`.
pub fn run_multi_send(args: &MultiSendArgs) -> Result<u8> {
    let network = Network::load(&args.network)?;
    print(&multi_send(&network, args)?)
}
