//! Error types for the core logic.
//!
//! The replica store is infallible by construction (every anomaly is a
//! no-op); only edit sessions can refuse an operation.

use thiserror::Error;

/// Why an [`crate::EditSession`] refused an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session was saved, cancelled or deleted already.
    #[error("edit session is closed")]
    Closed,

    /// A save is in flight; the draft is frozen until it finishes.
    #[error("edit session is submitting")]
    Submitting,

    /// Save requested while the draft is invalid, or unchanged for an edit.
    #[error("draft is not eligible for saving")]
    NotSaveable,

    /// Delete requested on a session that creates a new unit.
    #[error("only an existing unit can be deleted")]
    NotDeletable,
}
