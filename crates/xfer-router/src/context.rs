//! # Transaction Context
//!
//! The host-owned, request-scoped handle passed to every collaborator call.
//! The router neither creates nor commits it; it only records events on it.

use serde::{Deserialize, Serialize};

/// Event type for a processed message.
pub const EVENT_TYPE_MESSAGE: &str = "message";

/// Attribute key naming the module that handled a message.
pub const ATTRIBUTE_KEY_MODULE: &str = "module";

/// Module name reported for processed sends.
pub const ATTRIBUTE_VALUE_CATEGORY: &str = "bank";

/// A single key/value attribute on an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

/// A typed event emitted during message handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event type (e.g. `message`).
    pub kind: String,
    /// Ordered attributes.
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    /// Create an event with no attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(EventAttribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// The generic "message processed" event emitted after every successful send.
    pub fn message_processed() -> Self {
        Self::new(EVENT_TYPE_MESSAGE).with_attribute(ATTRIBUTE_KEY_MODULE, ATTRIBUTE_VALUE_CATEGORY)
    }

    /// Look up an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Request-scoped transaction context supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct TxContext {
    chain_id: String,
    block_height: u64,
    events: Vec<Event>,
}

impl TxContext {
    /// Create a context for one transaction on `chain_id` at `block_height`.
    pub fn new(chain_id: impl Into<String>, block_height: u64) -> Self {
        Self {
            chain_id: chain_id.into(),
            block_height,
            events: Vec::new(),
        }
    }

    /// The local chain identifier.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// The local block height the transaction executes at.
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Record an event.
    pub fn emit_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events recorded so far, in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
