//! Typed messages crossing the client boundary.
//!
//! - [`InboundEvent`]: everything the client reacts to, whether it came
//!   off the wire (`factories`, `new_factory`, ...) or from the transport
//!   itself (`connect`, `disconnect`, ...).
//! - [`OutboundMessage`]: everything the client sends.
//!
//! Payloads are decoded and validated before they become one of these,
//! so consumers never see loosely-typed JSON.

use factory_core::{Draft, GeneratorUnit, Intent, UnitFields, UnitId};

use crate::ProtocolError;

/// One event, in arrival order, for the single event-processing path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Transport established a connection.
    Connect,

    /// A connection attempt failed.
    ConnectError(String),

    /// Transport-level error that did not change the connection state.
    Error(String),

    /// The transport is about to retry; `attempt` starts at 1.
    ReconnectAttempt { attempt: u32 },

    /// Connection lost or closed.
    Disconnect { reason: String },

    /// Server rejected a proposed mutation.
    ServerError { message: String },

    /// Number of clients connected to the server.
    OnlineCount(u32),

    /// Heartbeat answer. The transport fills in the latency when it sent
    /// the matching ping.
    Pong { latency_ms: Option<u64> },

    /// Full collection; supersedes everything before it.
    Snapshot(Vec<GeneratorUnit>),

    /// A unit was created (possibly by us).
    Inserted(GeneratorUnit),

    /// A unit was changed (possibly by us).
    Updated(GeneratorUnit),

    /// A unit was deleted (possibly by us).
    Deleted(UnitId),
}

impl InboundEvent {
    /// Name used for logging; matches the wire/lifecycle event name.
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::Connect => "connect",
            InboundEvent::ConnectError(_) => "connect_error",
            InboundEvent::Error(_) => "error",
            InboundEvent::ReconnectAttempt { .. } => "reconnect_attempt",
            InboundEvent::Disconnect { .. } => "disconnect",
            InboundEvent::ServerError { .. } => "serverside-error",
            InboundEvent::OnlineCount(_) => "online_count",
            InboundEvent::Pong { .. } => "pong",
            InboundEvent::Snapshot(_) => "factories",
            InboundEvent::Inserted(_) => "new_factory",
            InboundEvent::Updated(_) => "factory_updated",
            InboundEvent::Deleted(_) => "factory_deleted",
        }
    }
}

/// A message the client sends. Fire-and-forget, never acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// `create_factory`
    CreateUnit(UnitFields),

    /// `edit_factory`
    EditUnit { id: UnitId, fields: UnitFields },

    /// `delete_factory`
    DeleteUnit(UnitId),

    /// Heartbeat, sent by the transport only.
    Ping,
}

impl OutboundMessage {
    /// Map a user intent to the message that carries it.
    ///
    /// Fails only for an edit draft without an id, which an edit session
    /// never produces.
    pub fn from_intent(intent: Intent) -> Result<Self, ProtocolError> {
        match intent {
            Intent::Create(draft) => Ok(OutboundMessage::CreateUnit(into_fields(draft))),
            Intent::Edit(draft) => {
                let id = draft.id().ok_or(ProtocolError::MissingId)?;
                Ok(OutboundMessage::EditUnit {
                    id,
                    fields: into_fields(draft),
                })
            }
            Intent::Delete(id) => Ok(OutboundMessage::DeleteUnit(id)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutboundMessage::CreateUnit(_) => crate::wire_types::CREATE_FACTORY,
            OutboundMessage::EditUnit { .. } => crate::wire_types::EDIT_FACTORY,
            OutboundMessage::DeleteUnit(_) => crate::wire_types::DELETE_FACTORY,
            OutboundMessage::Ping => crate::wire_types::PING,
        }
    }
}

fn into_fields(draft: Draft) -> UnitFields {
    draft.fields().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_core::EditSession;

    #[test]
    fn intents_map_to_messages() {
        let unit = GeneratorUnit::new(4, "old", 1, 50, vec![3]);

        let mut edit = EditSession::edit(&unit);
        edit.set_name("new").unwrap();
        let msg = OutboundMessage::from_intent(edit.save().unwrap()).unwrap();
        assert_eq!(
            msg,
            OutboundMessage::EditUnit {
                id: UnitId(4),
                fields: UnitFields {
                    name: "new".into(),
                    min_value: 1,
                    max_value: 50,
                    number_count: 1,
                },
            }
        );

        let msg = OutboundMessage::from_intent(Intent::Delete(UnitId(4))).unwrap();
        assert_eq!(msg.name(), "delete_factory");
    }

    #[test]
    fn edit_without_id_is_rejected() {
        let result = OutboundMessage::from_intent(Intent::Edit(Draft::blank()));
        assert!(matches!(result, Err(ProtocolError::MissingId)));
    }
}
