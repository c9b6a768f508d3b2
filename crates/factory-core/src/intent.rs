//! Intents: what the local user asked the server to do.
//!
//! These are **transport-agnostic** logical requests. The client crate
//! turns them into outbound wire messages; the protocol crate knows how to
//! encode those. Nothing here is ever applied to the replica directly.

use crate::draft::Draft;
use crate::unit::UnitId;

/// A proposed mutation of the server-owned collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Create a new unit from a draft that has no id yet.
    Create(Draft),

    /// Replace the fields of an existing unit. The draft carries the id.
    Edit(Draft),

    /// Delete an existing unit.
    Delete(UnitId),
}

impl Intent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Create(_) => "create",
            Intent::Edit(_) => "edit",
            Intent::Delete(_) => "delete",
        }
    }
}
