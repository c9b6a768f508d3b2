//! Drafts: value-copy working state of one unit under edit.
//!
//! A draft never aliases a stored [`GeneratorUnit`]; it is built from a
//! clone of the unit's editable fields. Its two derived flags (`changed`,
//! `valid`) are recomputed inside every mutation, so they can never be
//! observed out of date.

use crate::unit::{GeneratorUnit, UnitId};
use crate::validation;

/// The user-editable subset of a unit's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFields {
    pub name: String,
    pub min_value: i32,
    pub max_value: i32,
    pub number_count: u32,
}

impl UnitFields {
    /// Fields of a brand new unit: empty name, full value range, one number.
    pub fn blank() -> Self {
        UnitFields {
            name: String::new(),
            min_value: validation::MIN_VALUE,
            max_value: validation::MAX_VALUE,
            number_count: 1,
        }
    }
}

impl From<&GeneratorUnit> for UnitFields {
    fn from(unit: &GeneratorUnit) -> Self {
        UnitFields {
            name: unit.name.clone(),
            min_value: unit.min_value,
            max_value: unit.max_value,
            number_count: unit.number_count,
        }
    }
}

/// Working copy of a unit plus its derived flags.
///
/// `id` is `None` for a unit that does not exist on the server yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    id: Option<UnitId>,
    fields: UnitFields,
    changed: bool,
    valid: bool,
}

impl Draft {
    /// Draft for creating a new unit.
    pub fn blank() -> Self {
        Draft::with_fields(None, UnitFields::blank())
    }

    /// Draft for editing an existing unit (value copy).
    pub fn from_unit(unit: &GeneratorUnit) -> Self {
        Draft::with_fields(Some(unit.id), UnitFields::from(unit))
    }

    fn with_fields(id: Option<UnitId>, fields: UnitFields) -> Self {
        let valid = validation::is_valid(&fields);
        Draft {
            id,
            fields,
            changed: false,
            valid,
        }
    }

    pub fn id(&self) -> Option<UnitId> {
        self.id
    }

    pub fn fields(&self) -> &UnitFields {
        &self.fields
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn min_value(&self) -> i32 {
        self.fields.min_value
    }

    pub fn max_value(&self) -> i32 {
        self.fields.max_value
    }

    pub fn number_count(&self) -> u32 {
        self.fields.number_count
    }

    /// Has any field been touched since the draft was opened?
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Do the current fields pass [`validation::is_valid`]?
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Apply one field mutation and re-derive both flags.
    pub(crate) fn mutate(&mut self, edit: impl FnOnce(&mut UnitFields)) {
        edit(&mut self.fields);
        self.changed = true;
        self.valid = validation::is_valid(&self.fields);
    }
}
