//! Filter evaluator
//!
//! Evaluates a filter tree against in-memory records (`serde_json::Value`
//! documents) with per-field-type comparison rules.
//!
//! Nothing here fails. Incomplete conditions, unknown fields and operators
//! that do not apply to a field's type all evaluate to `true` so a broken
//! filter shows too many records rather than none. Missing record data is
//! different: a number or date comparison against an absent value is a
//! non-match.

use serde_json::Value as JsonValue;

use super::condition::{Condition, Operator};
use super::fields::{FieldRegistry, FieldType};
use super::group::{FilterGroup, Logic};
use crate::utils::json::{
    is_blank, is_falsy, is_missing, resolve_path, value_as_bool, value_as_f64, value_as_list,
    value_as_text,
};
use crate::utils::time::{local_date, parse_timestamp};

/// Evaluate a group against a record.
///
/// An empty group is vacuously true. Otherwise conditions and child
/// groups are combined with the group's logic, short-circuiting.
pub fn evaluate_group(record: &JsonValue, group: &FilterGroup, registry: &FieldRegistry) -> bool {
    if group.is_empty() {
        return true;
    }

    let mut results = group
        .conditions
        .iter()
        .map(|condition| evaluate_condition(record, condition, registry))
        .chain(
            group
                .groups
                .iter()
                .map(|child| evaluate_group(record, child, registry)),
        );

    match group.logic {
        Logic::And => results.all(|matched| matched),
        Logic::Or => results.any(|matched| matched),
    }
}

/// Evaluate a single condition against a record.
pub fn evaluate_condition(
    record: &JsonValue,
    condition: &Condition,
    registry: &FieldRegistry,
) -> bool {
    let Some(descriptor) = registry.descriptor(&condition.field) else {
        return true;
    };
    let actual = resolve_path(record, &condition.field);

    match condition.operator {
        Operator::IsEmpty => return is_missing(actual),
        Operator::IsNotEmpty => return !is_missing(actual),
        _ => {}
    }

    // Incomplete criteria do not filter
    if is_blank(Some(&condition.value)) {
        return true;
    }

    match descriptor.field_type {
        FieldType::Text => text_matches(condition, actual),
        FieldType::Number => number_matches(condition, actual),
        FieldType::Date => date_matches(condition, actual),
        FieldType::Boolean => boolean_matches(condition, actual),
        FieldType::Select => select_matches(condition, actual),
        FieldType::MultiSelect => multi_select_matches(condition, actual),
    }
}

/// Records matching the filter, in input order.
pub fn filter_records<'a>(
    records: &'a [JsonValue],
    root: &FilterGroup,
    registry: &FieldRegistry,
) -> Vec<&'a JsonValue> {
    let matched: Vec<&JsonValue> = records
        .iter()
        .filter(|record| evaluate_group(record, root, registry))
        .collect();

    tracing::debug!(
        total = records.len(),
        matched = matched.len(),
        conditions = root.count_conditions(),
        "Filtered records"
    );
    matched
}

/// Number of records matching the filter.
pub fn count_matches(records: &[JsonValue], root: &FilterGroup, registry: &FieldRegistry) -> usize {
    records
        .iter()
        .filter(|record| evaluate_group(record, root, registry))
        .count()
}

// ---------------------------------------------------------------------------
// Per-type comparisons
// ---------------------------------------------------------------------------

fn text_matches(condition: &Condition, actual: Option<&JsonValue>) -> bool {
    let actual = value_as_text(actual).to_lowercase();
    let expected = value_as_text(Some(&condition.value)).to_lowercase();

    match condition.operator {
        Operator::Equals => actual == expected,
        Operator::NotEquals => actual != expected,
        Operator::Contains => actual.contains(&expected),
        Operator::NotContains => !actual.contains(&expected),
        Operator::StartsWith => actual.starts_with(&expected),
        Operator::EndsWith => actual.ends_with(&expected),
        _ => true,
    }
}

fn number_matches(condition: &Condition, actual: Option<&JsonValue>) -> bool {
    let Some(actual) = actual.and_then(value_as_f64) else {
        return false;
    };
    let Some(expected) = value_as_f64(&condition.value) else {
        return true;
    };

    match condition.operator {
        Operator::Equals => actual == expected,
        Operator::NotEquals => actual != expected,
        Operator::GreaterThan => actual > expected,
        Operator::LessThan => actual < expected,
        Operator::GreaterThanOrEquals => actual >= expected,
        Operator::LessThanOrEquals => actual <= expected,
        Operator::Between => match upper_bound(condition, value_as_f64) {
            Some(upper) => actual >= expected && actual <= upper,
            None => true,
        },
        _ => true,
    }
}

fn date_matches(condition: &Condition, actual: Option<&JsonValue>) -> bool {
    if is_falsy(actual) {
        return false;
    }
    let Some(actual) = actual.and_then(parse_timestamp) else {
        return false;
    };
    let Some(expected) = parse_timestamp(&condition.value) else {
        return true;
    };

    match condition.operator {
        Operator::Equals => local_date(actual) == local_date(expected),
        Operator::NotEquals => local_date(actual) != local_date(expected),
        Operator::GreaterThan => actual > expected,
        Operator::LessThan => actual < expected,
        Operator::Between => match upper_bound(condition, parse_timestamp) {
            Some(upper) => actual >= expected && actual <= upper,
            None => true,
        },
        _ => true,
    }
}

fn boolean_matches(condition: &Condition, actual: Option<&JsonValue>) -> bool {
    let Some(expected) = value_as_bool(&condition.value) else {
        return true;
    };

    match condition.operator {
        Operator::Equals => actual.and_then(value_as_bool) == Some(expected),
        _ => true,
    }
}

fn select_matches(condition: &Condition, actual: Option<&JsonValue>) -> bool {
    match condition.operator {
        Operator::Equals => actual == Some(&condition.value),
        Operator::NotEquals => actual != Some(&condition.value),
        Operator::In => is_member(&condition.value, actual),
        Operator::NotIn => !is_member(&condition.value, actual),
        _ => true,
    }
}

fn multi_select_matches(condition: &Condition, actual: Option<&JsonValue>) -> bool {
    match condition.operator {
        Operator::In => is_member(&condition.value, actual),
        Operator::NotIn => !is_member(&condition.value, actual),
        _ => true,
    }
}

/// Whether the record value (or, for array values, any of its items) is one
/// of the condition's candidates. A bare scalar condition value counts as a
/// one-item list.
fn is_member(candidates: &JsonValue, actual: Option<&JsonValue>) -> bool {
    let candidates = value_as_list(candidates);
    match actual {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Array(items)) => items.iter().any(|item| candidates.contains(&item)),
        Some(scalar) => candidates.contains(&scalar),
    }
}

/// Parsed `value_to`, or `None` when it is missing or unparseable
fn upper_bound<T>(condition: &Condition, parse: impl Fn(&JsonValue) -> Option<T>) -> Option<T> {
    if is_blank(Some(&condition.value_to)) {
        return None;
    }
    parse(&condition.value_to)
}
