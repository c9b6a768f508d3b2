//! JSON envelope encoding/decoding.
//!
//! Every message on the wire, in both transport modes, is one envelope:
//!
//! ```text
//! {"event": "<name>", "data": <payload>}
//! ```
//!
//! Inbound (server → client):
//!
//! - `factories`        `{"factories": [Unit, ...]}`
//! - `new_factory`      `{"factory": Unit}`
//! - `factory_updated`  `{"factory": Unit}`
//! - `factory_deleted`  `{"id": int}`
//! - `serverside-error` `{"message": string}`
//! - `error`            string, or `{"message": string}`
//! - `online_count`     `{"online_count": int}`
//! - `pong`             anything
//!
//! Outbound (client → server):
//!
//! - `create_factory`   `{"name", "min_value", "max_value", "number_count"}`
//! - `edit_factory`     same plus `"id"`
//! - `delete_factory`   `{"id": int}`
//! - `ping`             `null`
//!
//! Unknown inbound event names decode to `Ok(None)`. They are not an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use factory_core::UnitId;

use crate::messages::{InboundEvent, OutboundMessage};
use crate::wire_types::{
    DraftPayload, Envelope, FactoriesPayload, FactoryPayload, IdPayload, MessagePayload,
    OnlineCountPayload, WireInboundName,
};
use crate::ProtocolError;

/// Decode one inbound envelope.
///
/// - `Ok(Some(event))`: a known event with a well-formed payload.
/// - `Ok(None)`: an event name this client does not know.
/// - `Err(_)`: not an envelope, or a known event with a malformed payload.
pub fn decode_inbound(text: &str) -> Result<Option<InboundEvent>, ProtocolError> {
    let envelope: Envelope<Value> = serde_json::from_str(text).map_err(ProtocolError::Json)?;

    let Some(name) = WireInboundName::from_name(&envelope.event) else {
        return Ok(None);
    };

    let event = match name {
        WireInboundName::Factories => {
            let p: FactoriesPayload = payload(name, envelope.data)?;
            InboundEvent::Snapshot(p.factories.into_iter().map(Into::into).collect())
        }
        WireInboundName::NewFactory => {
            let p: FactoryPayload = payload(name, envelope.data)?;
            InboundEvent::Inserted(p.factory.into())
        }
        WireInboundName::FactoryUpdated => {
            let p: FactoryPayload = payload(name, envelope.data)?;
            InboundEvent::Updated(p.factory.into())
        }
        WireInboundName::FactoryDeleted => {
            let p: IdPayload = payload(name, envelope.data)?;
            InboundEvent::Deleted(UnitId(p.id))
        }
        WireInboundName::ServersideError => {
            let p: MessagePayload = payload(name, envelope.data)?;
            InboundEvent::ServerError { message: p.message }
        }
        WireInboundName::Error => InboundEvent::Error(error_text(envelope.data)),
        WireInboundName::OnlineCount => {
            let p: OnlineCountPayload = payload(name, envelope.data)?;
            InboundEvent::OnlineCount(p.online_count)
        }
        WireInboundName::Pong => InboundEvent::Pong { latency_ms: None },
    };

    Ok(Some(event))
}

/// Encode one outbound message into an envelope string.
pub fn encode_outbound(msg: &OutboundMessage) -> Result<String, ProtocolError> {
    let data = match msg {
        OutboundMessage::CreateUnit(fields) => to_value(&DraftPayload::new(None, fields))?,
        OutboundMessage::EditUnit { id, fields } => {
            to_value(&DraftPayload::new(Some(*id), fields))?
        }
        OutboundMessage::DeleteUnit(id) => to_value(&IdPayload { id: id.0 })?,
        OutboundMessage::Ping => Value::Null,
    };

    let envelope = Envelope {
        event: msg.name().to_string(),
        data,
    };
    serde_json::to_string(&envelope).map_err(ProtocolError::Json)
}

/// Encode an inbound event the way a server would. Lifecycle events have
/// no wire form and return `Ok(None)`.
///
/// Used by test servers and replay tools.
pub fn encode_inbound(event: &InboundEvent) -> Result<Option<String>, ProtocolError> {
    use crate::wire_types::WireUnit;

    let (name, data) = match event {
        InboundEvent::Snapshot(units) => (
            WireInboundName::Factories,
            to_value(&FactoriesPayload {
                factories: units.iter().map(WireUnit::from).collect(),
            })?,
        ),
        InboundEvent::Inserted(unit) => (
            WireInboundName::NewFactory,
            to_value(&FactoryPayload { factory: unit.into() })?,
        ),
        InboundEvent::Updated(unit) => (
            WireInboundName::FactoryUpdated,
            to_value(&FactoryPayload { factory: unit.into() })?,
        ),
        InboundEvent::Deleted(id) => (
            WireInboundName::FactoryDeleted,
            to_value(&IdPayload { id: id.0 })?,
        ),
        InboundEvent::ServerError { message } => (
            WireInboundName::ServersideError,
            to_value(&MessagePayload { message: message.clone() })?,
        ),
        InboundEvent::Error(text) => (WireInboundName::Error, Value::String(text.clone())),
        InboundEvent::OnlineCount(n) => (
            WireInboundName::OnlineCount,
            to_value(&OnlineCountPayload { online_count: *n })?,
        ),
        InboundEvent::Pong { .. } => (WireInboundName::Pong, Value::Null),
        InboundEvent::Connect
        | InboundEvent::ConnectError(_)
        | InboundEvent::ReconnectAttempt { .. }
        | InboundEvent::Disconnect { .. } => return Ok(None),
    };

    let envelope = Envelope {
        event: name.as_str().to_string(),
        data,
    };
    serde_json::to_string(&envelope)
        .map(Some)
        .map_err(ProtocolError::Json)
}

/// Decode an outbound envelope, server side. Unknown names yield `Ok(None)`.
pub fn decode_outbound(text: &str) -> Result<Option<OutboundMessage>, ProtocolError> {
    use crate::wire_types::{CREATE_FACTORY, DELETE_FACTORY, EDIT_FACTORY, PING};
    use factory_core::UnitFields;

    let envelope: Envelope<Value> = serde_json::from_str(text).map_err(ProtocolError::Json)?;
    let fields = |p: &DraftPayload| UnitFields {
        name: p.name.clone(),
        min_value: p.min_value,
        max_value: p.max_value,
        number_count: p.number_count,
    };

    let msg = match envelope.event.as_str() {
        CREATE_FACTORY => {
            let p: DraftPayload = decode_payload(CREATE_FACTORY, envelope.data)?;
            OutboundMessage::CreateUnit(fields(&p))
        }
        EDIT_FACTORY => {
            let p: DraftPayload = decode_payload(EDIT_FACTORY, envelope.data)?;
            let id = p.id.ok_or(ProtocolError::MissingId)?;
            OutboundMessage::EditUnit {
                id: UnitId(id),
                fields: fields(&p),
            }
        }
        DELETE_FACTORY => {
            let p: IdPayload = decode_payload(DELETE_FACTORY, envelope.data)?;
            OutboundMessage::DeleteUnit(UnitId(p.id))
        }
        PING => OutboundMessage::Ping,
        _ => return Ok(None),
    };
    Ok(Some(msg))
}

fn payload<T: DeserializeOwned>(name: WireInboundName, data: Value) -> Result<T, ProtocolError> {
    decode_payload(name.as_str(), data)
}

fn decode_payload<T: DeserializeOwned>(event: &'static str, data: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(|source| ProtocolError::MalformedPayload { event, source })
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(value).map_err(ProtocolError::Json)
}

/// `error` payloads are a bare string on some servers, an object on others.
fn error_text(data: Value) -> String {
    match &data {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(s)) => s.clone(),
            _ => data.to_string(),
        },
        Value::Null => "unknown error".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_core::{GeneratorUnit, UnitFields};
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_snapshot_without_number_count() {
        let text = r#"{"event":"factories","data":{"factories":[
            {"id":1,"name":"a","min_value":1,"max_value":10,"numbers":[2,3]},
            {"id":2,"name":"b","min_value":5,"max_value":6,"numbers":[]}
        ]}}"#;

        let event = decode_inbound(text).unwrap().unwrap();
        assert_eq!(
            event,
            InboundEvent::Snapshot(vec![
                GeneratorUnit::new(1, "a", 1, 10, vec![2, 3]),
                GeneratorUnit::new(2, "b", 5, 6, vec![]),
            ])
        );
    }

    #[test]
    fn keeps_explicit_number_count() {
        let text = r#"{"event":"new_factory","data":{"factory":
            {"id":9,"name":"z","min_value":1,"max_value":3,"number_count":7,"numbers":[1]}}}"#;

        match decode_inbound(text).unwrap() {
            Some(InboundEvent::Inserted(unit)) => {
                assert_eq!(unit.number_count, 7);
                assert_eq!(unit.numbers, vec![1]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decodes_delete_and_errors() {
        assert_eq!(
            decode_inbound(r#"{"event":"factory_deleted","data":{"id":4}}"#).unwrap(),
            Some(InboundEvent::Deleted(UnitId(4)))
        );
        assert_eq!(
            decode_inbound(r#"{"event":"serverside-error","data":{"message":"nope"}}"#).unwrap(),
            Some(InboundEvent::ServerError { message: "nope".into() })
        );
        assert_eq!(
            decode_inbound(r#"{"event":"error","data":"Name too long"}"#).unwrap(),
            Some(InboundEvent::Error("Name too long".into()))
        );
        assert_eq!(
            decode_inbound(r#"{"event":"online_count","data":{"online_count":3}}"#).unwrap(),
            Some(InboundEvent::OnlineCount(3))
        );
    }

    #[test]
    fn unknown_event_is_not_an_error() {
        assert_eq!(decode_inbound(r#"{"event":"weather","data":{"sunny":true}}"#).unwrap(), None);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let err = decode_inbound(r#"{"event":"factory_deleted","data":{"id":"four"}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload { event: "factory_deleted", .. }));

        assert!(matches!(decode_inbound("not json"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn encodes_outbound_messages() {
        let fields = UnitFields {
            name: "pump".into(),
            min_value: 2,
            max_value: 20,
            number_count: 4,
        };

        let create: Value =
            serde_json::from_str(&encode_outbound(&OutboundMessage::CreateUnit(fields.clone())).unwrap())
                .unwrap();
        assert_eq!(
            create,
            serde_json::json!({
                "event": "create_factory",
                "data": {"name": "pump", "min_value": 2, "max_value": 20, "number_count": 4}
            })
        );

        let edit: Value = serde_json::from_str(
            &encode_outbound(&OutboundMessage::EditUnit { id: UnitId(3), fields }).unwrap(),
        )
        .unwrap();
        assert_eq!(edit["data"]["id"], 3);

        let delete: Value =
            serde_json::from_str(&encode_outbound(&OutboundMessage::DeleteUnit(UnitId(3))).unwrap())
                .unwrap();
        assert_eq!(delete, serde_json::json!({"event": "delete_factory", "data": {"id": 3}}));
    }

    #[test]
    fn server_side_helpers_mirror_client_codec() {
        let event = InboundEvent::Updated(GeneratorUnit::new(5, "u", 1, 9, vec![8]));
        let text = encode_inbound(&event).unwrap().unwrap();
        assert_eq!(decode_inbound(&text).unwrap(), Some(event));

        assert_eq!(encode_inbound(&InboundEvent::Connect).unwrap(), None);

        let text = encode_outbound(&OutboundMessage::DeleteUnit(UnitId(8))).unwrap();
        assert_eq!(decode_outbound(&text).unwrap(), Some(OutboundMessage::DeleteUnit(UnitId(8))));
    }
}
