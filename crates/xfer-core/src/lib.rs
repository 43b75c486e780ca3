//! # xfer-core: Foundational Types for the xfer Stack
//!
//! This crate defines the value types every routing decision is made of.
//! Every other crate in the workspace depends on `xfer-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes.** `Address`, `Amount`, `Coin` and `CoinSet` can
//!    only be built through checked constructors. A `CoinSet` never holds two
//!    entries for the same denomination.
//!
//! 2. **One codec.** All bech32 handling goes through [`address`]. The
//!    prefix-only decode keeps the prefix exactly as written so callers can
//!    compare it byte-for-byte.
//!
//! 3. **Request-scoped values.** Nothing here holds state beyond the call
//!    that created it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `xfer-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod channel;
pub mod coin;
pub mod error;
pub mod height;

// Re-export primary types for ergonomic imports.
pub use address::{decode_prefix, Address, MAX_ADDRESS_LEN};
pub use channel::ChannelRecord;
pub use coin::{Amount, Coin, CoinSet};
pub use error::{AddressError, CoinError, XferError};
pub use height::Height;
