//! Generator units: the server-owned entities mirrored by the client.
//!
//! A unit is created, renamed, re-ranged and deleted by users, but its
//! `numbers` are always computed by the server. The client never edits a
//! stored [`GeneratorUnit`] directly; see [`crate::draft::Draft`].

use std::fmt;

/// Server-assigned identifier of a generator unit.
///
/// Opaque to the client: compared and hashed, never interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub i64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A generator unit as last broadcast by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorUnit {
    /// Immutable once assigned.
    pub id: UnitId,

    pub name: String,

    /// Lower bound of the generated numbers.
    pub min_value: i32,

    /// Upper bound of the generated numbers.
    pub max_value: i32,

    /// How many numbers the server was asked to generate.
    pub number_count: u32,

    /// Server-computed values. Read-only from the client's perspective.
    pub numbers: Vec<i32>,
}

impl GeneratorUnit {
    /// Convenience constructor, mostly for tests and fixtures.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        min_value: i32,
        max_value: i32,
        numbers: Vec<i32>,
    ) -> Self {
        GeneratorUnit {
            id: UnitId(id),
            name: name.into(),
            min_value,
            max_value,
            number_count: numbers.len() as u32,
            numbers,
        }
    }

    /// Human readable child count, e.g. `"1 child"` / `"3 children"`.
    pub fn child_count_label(&self) -> String {
        plural(self.number_count, "child", "children")
    }
}

/// `plural(1, "child", "children") == "1 child"`.
pub fn plural(value: u32, singular: &str, plural: &str) -> String {
    if value == 1 {
        format!("{} {}", value, singular)
    } else {
        format!("{} {}", value, plural)
    }
}
