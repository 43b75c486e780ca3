//! # xfer CLI entry point
//!
//! Parses command-line arguments, sets up logging and optional metrics,
//! and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use xfer_cli::address::{run_decode, run_encode, DecodeArgs, EncodeArgs};
use xfer_cli::observability::{init_tracing, install_metrics};
use xfer_cli::transfer::{run_multi_send, run_send, MultiSendArgs, SendArgs};

/// xfer: prefix-routed transfers.
///
/// Routes sends between a local ledger and cross-chain channels according
/// to the recipient's bech32 prefix, over a network described in YAML.
#[derive(Parser, Debug)]
#[command(name = "xfer", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Collect metrics and print them in Prometheus format to stderr.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Route a single send.
    Send(SendArgs),

    /// Validate and execute a multi-input/multi-output send.
    MultiSend(MultiSendArgs),

    /// Decode a bech32 address into prefix and hex payload.
    Decode(DecodeArgs),

    /// Encode a prefix and hex payload as a bech32 address.
    Encode(EncodeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let metrics = if cli.metrics {
        match install_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("{e:#}");
                return ExitCode::from(1);
            }
        }
    } else {
        None
    };

    let result = match &cli.command {
        Commands::Send(args) => run_send(args),
        Commands::MultiSend(args) => run_multi_send(args),
        Commands::Decode(args) => run_decode(args),
        Commands::Encode(args) => run_encode(args),
    };

    if let Some(handle) = metrics {
        eprint!("{}", handle.render());
    }

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
