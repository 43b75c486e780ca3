//! # Send Telemetry
//!
//! Best-effort gauges for locally settled sends, emitted through the
//! `metrics` facade. Nothing here can fail a send: amounts outside the
//! gauge's integer range are skipped, and without an installed recorder
//! every call is a no-op.

use xfer_core::{Amount, CoinSet};

/// Gauge set to the amount of each coin in a local send, labelled by denom.
pub const SEND_GAUGE: &str = "tx_msg_send";

/// Label carrying the coin denomination.
pub const DENOM_LABEL: &str = "denom";

/// Register gauge descriptions with the installed recorder.
pub fn describe() {
    metrics::describe_gauge!(SEND_GAUGE, "Amount of the most recent local send, per denomination");
}

/// The gauge value for `amount`, or `None` when it does not fit an `i64`.
pub fn gauge_value(amount: Amount) -> Option<f64> {
    amount.to_i64().map(|v| v as f64)
}

/// Set [`SEND_GAUGE`] for every representable coin in `coins`.
pub fn record_send(coins: &CoinSet) {
    for coin in coins {
        if let Some(value) = gauge_value(coin.amount()) {
            metrics::gauge!(SEND_GAUGE, DENOM_LABEL => coin.denom().to_string()).set(value);
        }
    }
}
