//! # Channel Records
//!
//! The outbound channel a foreign prefix maps to, as owned by the prefix
//! registry.

use serde::{Deserialize, Serialize};

/// Outbound channel descriptor for one foreign prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Channel identifier on this chain's side (e.g. `channel-7`).
    pub source_channel: String,
    /// Blocks added to the remote light-client height to form the timeout.
    pub timeout_height_offset: u64,
}

impl ChannelRecord {
    /// Create a channel record.
    pub fn new(source_channel: impl Into<String>, timeout_height_offset: u64) -> Self {
        Self {
            source_channel: source_channel.into(),
            timeout_height_offset,
        }
    }
}
