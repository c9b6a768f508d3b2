//! Validation rules for user-proposed unit fields.
//!
//! This is a single boolean gate on the save action, not a field-level
//! diagnostic. The server validates again on its side; the client never
//! re-validates units it receives.

use crate::draft::UnitFields;

/// Names must be strictly shorter than this many characters.
pub const MAX_NAME_LEN: usize = 256;

/// Upper bound (inclusive) on how many numbers a unit may generate.
pub const MAX_NUMBER_COUNT: u32 = 15;

/// Smallest allowed `min_value`.
pub const MIN_VALUE: i32 = 1;

/// Largest allowed `max_value`.
pub const MAX_VALUE: i32 = 1000;

/// Returns true when `fields` may be submitted:
///
/// - `0 < len(name) < 256` (counted in characters)
/// - `0 < number_count <= 15`
/// - `0 < min_value < max_value <= 1000`
pub fn is_valid(fields: &UnitFields) -> bool {
    name_ok(&fields.name)
        && count_ok(fields.number_count)
        && range_ok(fields.min_value, fields.max_value)
}

fn name_ok(name: &str) -> bool {
    let len = name.chars().count();
    len > 0 && len < MAX_NAME_LEN
}

fn count_ok(count: u32) -> bool {
    count > 0 && count <= MAX_NUMBER_COUNT
}

fn range_ok(min: i32, max: i32) -> bool {
    min >= MIN_VALUE && min < max && max <= MAX_VALUE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, min_value: i32, max_value: i32, number_count: u32) -> UnitFields {
        UnitFields {
            name: name.to_string(),
            min_value,
            max_value,
            number_count,
        }
    }

    #[test]
    fn widest_valid_draft() {
        assert!(is_valid(&fields("A", 1, 1000, 15)));
    }

    #[test]
    fn empty_name_is_invalid() {
        assert!(!is_valid(&fields("", 1, 1000, 15)));
    }

    #[test]
    fn name_length_boundary() {
        let ok = "x".repeat(255);
        let too_long = "x".repeat(256);
        assert!(is_valid(&fields(&ok, 1, 10, 1)));
        assert!(!is_valid(&fields(&too_long, 1, 10, 1)));
    }

    #[test]
    fn name_length_counts_characters() {
        // 255 two-byte characters: 510 bytes, still a valid name.
        let wide = "é".repeat(255);
        assert!(is_valid(&fields(&wide, 1, 10, 1)));
    }

    #[test]
    fn min_must_be_below_max() {
        assert!(!is_valid(&fields("A", 500, 400, 5)));
        assert!(!is_valid(&fields("A", 400, 400, 5)));
        assert!(is_valid(&fields("A", 399, 400, 5)));
    }

    #[test]
    fn min_must_be_positive() {
        assert!(!is_valid(&fields("A", 0, 400, 5)));
        assert!(!is_valid(&fields("A", -3, 400, 5)));
    }

    #[test]
    fn number_count_flips_at_fifteen() {
        assert!(is_valid(&fields("A", 1, 1000, 15)));
        assert!(!is_valid(&fields("A", 1, 1000, 16)));
        assert!(!is_valid(&fields("A", 1, 1000, 0)));
    }

    #[test]
    fn max_value_flips_at_one_thousand() {
        assert!(is_valid(&fields("A", 1, 1000, 3)));
        assert!(!is_valid(&fields("A", 1, 1001, 3)));
    }
}
