//! factory-core
//!
//! Pure client-side logic for the factory channel:
//! - units (the server-owned entities) and their drafts
//! - validation rules gating the save action
//! - per-unit edit sessions
//! - the insertion-ordered local replica
//!
//! No networking and no wire format here; see `factory-protocol` and
//! `factory-client`.

pub mod unit;
pub mod validation;
pub mod draft;
pub mod intent;
pub mod edit_session;
pub mod store;
pub mod error;

pub use unit::{GeneratorUnit, UnitId};
pub use draft::{Draft, UnitFields};
pub use intent::Intent;
pub use edit_session::{EditSession, SessionKind, SessionState};
pub use store::CollectionStore;
pub use error::SessionError;
pub use validation::is_valid;
