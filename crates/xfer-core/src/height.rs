//! # Light-Client Heights
//!
//! A [`Height`] is a verified checkpoint of a remote ledger, expressed as a
//! (revision number, revision height) pair. Heights order by revision
//! number first, then by height within the revision.

use serde::{Deserialize, Serialize};

/// A (revision number, revision height) checkpoint of a remote ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Height {
    /// Revision (chain upgrade epoch) of the remote ledger.
    pub revision_number: u64,
    /// Block height within the revision.
    pub revision_height: u64,
}

impl Height {
    /// Create a height.
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// Whether this is the zero height (no height-based timeout).
    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }

    /// The same revision, `offset` blocks later. `None` on overflow.
    pub fn checked_add_blocks(&self, offset: u64) -> Option<Height> {
        self.revision_height
            .checked_add(offset)
            .map(|revision_height| Height::new(self.revision_number, revision_height))
    }
}

impl std::fmt::Display for Height {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}
