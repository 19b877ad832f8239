//! Stable bubble identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable identifier for one bubble in the live set.
///
/// Ids are handed out by the owning pool in increasing order and are never
/// reused within a page session, so renderers and input handlers can key
/// drawable resources and hover state by id without holding a reference
/// into the arena.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BubbleId(pub u64);

impl BubbleId {
    /// Create a BubbleId from a raw value
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The id that follows this one in allocation order
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BubbleId({})", self.0)
    }
}

impl fmt::Display for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
