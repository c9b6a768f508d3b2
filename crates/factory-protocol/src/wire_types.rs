//! Low-level wire types and constants.
//!
//! This module defines:
//! - the event names used in the JSON envelope, both directions,
//! - the serde shapes of every payload,
//! - the frame size limit for the TCP transport mode.
//!
//! The actual encode/decode logic lives in `json_codec` and `frame`.

use serde::{Deserialize, Serialize};

use factory_core::{GeneratorUnit, UnitFields, UnitId};

/// Maximum size of one TCP frame payload (1 MiB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Inbound event names (server → client).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WireInboundName {
    /// Full collection after connect.
    Factories,
    NewFactory,
    FactoryUpdated,
    FactoryDeleted,
    /// Rejected mutation, shown as a dismissible banner.
    ServersideError,
    /// Generic error signal.
    Error,
    OnlineCount,
    Pong,
}

impl WireInboundName {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "factories" => Some(WireInboundName::Factories),
            "new_factory" => Some(WireInboundName::NewFactory),
            "factory_updated" => Some(WireInboundName::FactoryUpdated),
            "factory_deleted" => Some(WireInboundName::FactoryDeleted),
            "serverside-error" => Some(WireInboundName::ServersideError),
            "error" => Some(WireInboundName::Error),
            "online_count" => Some(WireInboundName::OnlineCount),
            "pong" => Some(WireInboundName::Pong),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WireInboundName::Factories => "factories",
            WireInboundName::NewFactory => "new_factory",
            WireInboundName::FactoryUpdated => "factory_updated",
            WireInboundName::FactoryDeleted => "factory_deleted",
            WireInboundName::ServersideError => "serverside-error",
            WireInboundName::Error => "error",
            WireInboundName::OnlineCount => "online_count",
            WireInboundName::Pong => "pong",
        }
    }
}

/// Outbound message names (client → server).
pub const CREATE_FACTORY: &str = "create_factory";
pub const EDIT_FACTORY: &str = "edit_factory";
pub const DELETE_FACTORY: &str = "delete_factory";
pub const PING: &str = "ping";

/// `{"event": ..., "data": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub event: String,
    #[serde(default)]
    pub data: T,
}

/// A unit as the server serializes it.
///
/// Older servers omit `number_count`; it then defaults to `numbers.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireUnit {
    pub id: i64,
    pub name: String,
    pub min_value: i32,
    pub max_value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_count: Option<u32>,
    #[serde(default)]
    pub numbers: Vec<i32>,
}

impl From<WireUnit> for GeneratorUnit {
    fn from(w: WireUnit) -> Self {
        let number_count = w.number_count.unwrap_or(w.numbers.len() as u32);
        GeneratorUnit {
            id: UnitId(w.id),
            name: w.name,
            min_value: w.min_value,
            max_value: w.max_value,
            number_count,
            numbers: w.numbers,
        }
    }
}

impl From<&GeneratorUnit> for WireUnit {
    fn from(u: &GeneratorUnit) -> Self {
        WireUnit {
            id: u.id.0,
            name: u.name.clone(),
            min_value: u.min_value,
            max_value: u.max_value,
            number_count: Some(u.number_count),
            numbers: u.numbers.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FactoriesPayload {
    pub factories: Vec<WireUnit>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FactoryPayload {
    pub factory: WireUnit,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdPayload {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OnlineCountPayload {
    pub online_count: u32,
}

/// Body of `create_factory` / `edit_factory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub min_value: i32,
    pub max_value: i32,
    pub number_count: u32,
}

impl DraftPayload {
    pub fn new(id: Option<UnitId>, fields: &UnitFields) -> Self {
        DraftPayload {
            id: id.map(|id| id.0),
            name: fields.name.clone(),
            min_value: fields.min_value,
            max_value: fields.max_value,
            number_count: fields.number_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_names_round_trip() {
        for name in [
            "factories",
            "new_factory",
            "factory_updated",
            "factory_deleted",
            "serverside-error",
            "error",
            "online_count",
            "pong",
        ] {
            let parsed = WireInboundName::from_name(name).expect(name);
            assert_eq!(parsed.as_str(), name);
        }
        assert_eq!(WireInboundName::from_name("factory_exploded"), None);
    }

    #[test]
    fn wire_unit_defaults_number_count() {
        let w = WireUnit {
            id: 3,
            name: "n".into(),
            min_value: 1,
            max_value: 9,
            number_count: None,
            numbers: vec![2, 3, 4],
        };
        let unit = GeneratorUnit::from(w);
        assert_eq!(unit.number_count, 3);
        assert_eq!(unit.id, UnitId(3));
    }
}
