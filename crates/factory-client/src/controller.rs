// crates/factory-client/src/controller.rs

//! Ties the replica, the connection and the open form together.

use factory_core::{CollectionStore, EditSession, Intent, SessionError, UnitId};
use factory_protocol::{InboundEvent, OutboundMessage};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::connection::ConnectionManager;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("no form is open")]
    NoSession,

    /// The draft stays open; it can be saved once reconnected.
    #[error("not connected")]
    NotConnected,
}

pub struct AppController {
    connection: ConnectionManager,
    store: CollectionStore,
    session: Option<EditSession>,
}

impl AppController {
    pub fn new(connection: ConnectionManager) -> Self {
        Self {
            connection,
            store: CollectionStore::new(),
            session: None,
        }
    }

    pub fn start(&mut self) {
        self.connection.start();
    }

    pub fn handle_inbound(&mut self, event: InboundEvent) {
        self.connection.dispatch(event, &mut self.store);
    }

    /// Open a blank creation form, replacing any open one.
    pub fn open_create(&mut self) -> &mut EditSession {
        self.session.insert(EditSession::create())
    }

    /// Open an edit form on a copy of unit `id`. `None` if the replica has
    /// no such unit.
    pub fn open_edit(&mut self, id: UnitId) -> Option<&mut EditSession> {
        let unit = self.store.get(id)?;
        Some(self.session.insert(EditSession::edit(unit)))
    }

    pub fn active_session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn active_session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    /// Submit the open form and close it.
    pub fn save_active(&mut self) -> Result<(), ControllerError> {
        let session = self.session.as_mut().ok_or(ControllerError::NoSession)?;
        if !self.connection.is_connected() {
            return Err(ControllerError::NotConnected);
        }

        let intent = session.begin_save()?;
        info!(kind = intent.kind(), "saving");
        session.finish_save()?;
        self.session = None;
        if !self.submit(intent) {
            error!("save was not handed to the transport");
        }
        Ok(())
    }

    /// Discard the open form without sending anything.
    pub fn cancel_active(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel();
            debug!("form cancelled");
        }
    }

    /// Request deletion of the unit under edit and close the form.
    pub fn delete_active(&mut self) -> Result<(), ControllerError> {
        let session = self.session.as_mut().ok_or(ControllerError::NoSession)?;
        if !self.connection.is_connected() {
            return Err(ControllerError::NotConnected);
        }

        let intent = session.delete()?;
        info!(kind = intent.kind(), "deleting");
        self.session = None;
        if !self.submit(intent) {
            error!("delete was not handed to the transport");
        }
        Ok(())
    }

    /// Send an intent as its outbound message. Returns whether it was
    /// handed to the transport.
    pub fn submit(&self, intent: Intent) -> bool {
        match OutboundMessage::from_intent(intent) {
            Ok(msg) => self.connection.send(msg),
            Err(e) => {
                error!("cannot submit: {}", e);
                false
            }
        }
    }

    pub fn dismiss_business_error(&mut self) {
        self.connection.dismiss_business_error();
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }
}
