//! Per-unit edit session.
//!
//! State machine:
//!
//! ```text
//! Pristine --set_*--> Editing --set_*--> Editing
//!     |                  |
//!     +---begin_save-----+--> Submitting --finish_save--> Closed
//!     |                  |
//!     +---cancel/delete--+-----------------------------> Closed
//! ```
//!
//! Save eligibility differs by kind:
//! - creating a unit: the draft only has to be valid,
//! - editing a unit: the draft must be valid **and** changed, since
//!   resubmitting an untouched unit is a wasted round trip.
//!
//! A session never writes to the replica. Its only output is an
//! [`Intent`]; the replica changes when the server's broadcast comes back.

use crate::draft::{Draft, UnitFields};
use crate::error::SessionError;
use crate::intent::Intent;
use crate::unit::{GeneratorUnit, UnitId};

/// Whether the session creates a new unit or edits an existing one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionKind {
    Create,
    Edit(UnitId),
}

/// Lifecycle state of an [`EditSession`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Just opened, nothing touched.
    Pristine,
    /// At least one field was set.
    Editing,
    /// Save requested, outbound send not issued yet.
    Submitting,
    /// Terminal: saved, cancelled or deleted.
    Closed,
}

/// Exclusively owns one [`Draft`].
#[derive(Debug, Clone)]
pub struct EditSession {
    kind: SessionKind,
    state: SessionState,
    draft: Draft,
}

impl EditSession {
    /// Open a session for a unit that does not exist yet.
    pub fn create() -> Self {
        EditSession {
            kind: SessionKind::Create,
            state: SessionState::Pristine,
            draft: Draft::blank(),
        }
    }

    /// Open a session on a value copy of `unit`.
    pub fn edit(unit: &GeneratorUnit) -> Self {
        EditSession {
            kind: SessionKind::Edit(unit.id),
            state: SessionState::Pristine,
            draft: Draft::from_unit(unit),
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// `valid` for creation, `valid && changed` for edits.
    pub fn can_save(&self) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.kind {
            SessionKind::Create => self.draft.is_valid(),
            SessionKind::Edit(_) => self.draft.is_valid() && self.draft.is_changed(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        let name = name.into();
        self.set(|f| f.name = name)
    }

    pub fn set_min_value(&mut self, value: i32) -> Result<(), SessionError> {
        self.set(|f| f.min_value = value)
    }

    pub fn set_max_value(&mut self, value: i32) -> Result<(), SessionError> {
        self.set(|f| f.max_value = value)
    }

    pub fn set_number_count(&mut self, count: u32) -> Result<(), SessionError> {
        self.set(|f| f.number_count = count)
    }

    /// Package the draft into an intent and enter `Submitting`.
    ///
    /// The caller hands the intent to the outbound path and then calls
    /// [`EditSession::finish_save`].
    pub fn begin_save(&mut self) -> Result<Intent, SessionError> {
        self.ensure_open()?;
        if !self.can_save() {
            return Err(SessionError::NotSaveable);
        }

        let draft = self.draft.clone();
        let intent = match self.kind {
            SessionKind::Create => Intent::Create(draft),
            SessionKind::Edit(_) => Intent::Edit(draft),
        };
        self.state = SessionState::Submitting;
        Ok(intent)
    }

    /// Close a session after its save was handed off.
    pub fn finish_save(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Submitting => {
                self.state = SessionState::Closed;
                Ok(())
            }
            SessionState::Closed => Err(SessionError::Closed),
            SessionState::Pristine | SessionState::Editing => Err(SessionError::NotSaveable),
        }
    }

    /// [`begin_save`](Self::begin_save) followed by
    /// [`finish_save`](Self::finish_save).
    pub fn save(&mut self) -> Result<Intent, SessionError> {
        let intent = self.begin_save()?;
        self.finish_save()?;
        Ok(intent)
    }

    /// Discard the draft. Never produces traffic.
    pub fn cancel(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Request deletion of the unit under edit.
    pub fn delete(&mut self) -> Result<Intent, SessionError> {
        self.ensure_open()?;
        match self.kind {
            SessionKind::Create => Err(SessionError::NotDeletable),
            SessionKind::Edit(id) => {
                self.state = SessionState::Closed;
                Ok(Intent::Delete(id))
            }
        }
    }

    fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Pristine | SessionState::Editing)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Pristine | SessionState::Editing => Ok(()),
            SessionState::Submitting => Err(SessionError::Submitting),
            SessionState::Closed => Err(SessionError::Closed),
        }
    }

    /// Field mutation and flag re-derivation happen as one step.
    fn set(&mut self, edit: impl FnOnce(&mut UnitFields)) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.draft.mutate(edit);
        self.state = SessionState::Editing;
        Ok(())
    }
}
