//! # xfer-cli: xfer Stack Command-Line Interface
//!
//! A clap-based front end that drives the router against a network
//! described in YAML, using the in-memory collaborators from
//! `xfer-router`.
//!
//! ## Subcommands
//!
//! - `send`: Route one send and print a JSON report
//! - `multi-send`: Validate and execute a batch send
//! - `decode`: Split a bech32 address into prefix and hex payload
//! - `encode`: Build a bech32 address from prefix and hex payload
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `xfer-router`; no routing logic lives here.
//! - Reports go to stdout as JSON; logs and metrics go to stderr.

pub mod address;
pub mod network;
pub mod observability;
pub mod report;
pub mod transfer;
