//! # Batch Transfer Validation
//!
//! Checks a multi-input/multi-output send against ledger policy before
//! handing it to the ledger. All checks run before any balance moves, so a
//! rejected batch has no effect.
//!
//! Balance of inputs against outputs and address well-formedness are the
//! upstream [`BatchTransfer::validate_basic`] contract. An output address
//! that still fails to decode here is reported as
//! [`RouteError::InvalidAddress`] with its position rather than aborting.

use xfer_core::Address;

use crate::context::{Event, TxContext};
use crate::error::{AddressRole, RouteError, RouteOutcome};
use crate::intent::BatchTransfer;
use crate::router::ensure_send_enabled;
use crate::traits::LocalTransferExecutor;

/// Enforces send policy and the recipient blocklist over a batch.
#[derive(Debug)]
pub struct BatchTransferValidator<'a, L: ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LocalTransferExecutor + ?Sized> BatchTransferValidator<'a, L> {
    /// Create a validator over `ledger`.
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Run every check without moving funds.
    pub fn validate(&self, ctx: &TxContext, batch: &BatchTransfer) -> RouteOutcome {
        for input in &batch.inputs {
            ensure_send_enabled(self.ledger, ctx, &input.coins)?;
        }

        for (index, output) in batch.outputs.iter().enumerate() {
            let recipient = Address::from_bech32(&output.address).map_err(|source| {
                RouteError::invalid_address(AddressRole::Output(index), &output.address, source)
            })?;
            if self.ledger.is_blocked(ctx, &recipient) {
                return Err(RouteError::RecipientBlocked {
                    address: output.address.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate, then delegate the whole batch to the ledger.
    pub fn validate_and_execute(&self, ctx: &mut TxContext, batch: &BatchTransfer) -> RouteOutcome {
        self.validate(ctx, batch)?;
        self.ledger
            .batch_transfer(ctx, &batch.inputs, &batch.outputs)?;
        ctx.emit_event(Event::message_processed());
        Ok(())
    }
}
