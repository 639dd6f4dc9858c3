//! Condition model
//!
//! A condition is the leaf of the filter tree: one field, one operator and
//! up to two operand values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::fields::FieldRegistry;
use super::new_id;

/// Comparison operator token.
///
/// Which operators are valid depends on the field's semantic type, see
/// [`FieldType::operators`](super::fields::FieldType::operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEquals,
    LessThanOrEquals,
    Between,
    In,
    NotIn,
    IsEmpty,
    IsNotEmpty,
}

impl Operator {
    /// False only for the no-operand operators (`is_empty`, `is_not_empty`)
    pub fn requires_value(self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }

    /// True only for range operators (`between`)
    pub fn requires_two_values(self) -> bool {
        matches!(self, Self::Between)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterThanOrEquals => "greater_than_or_equals",
            Self::LessThanOrEquals => "less_than_or_equals",
            Self::Between => "between",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field predicate.
///
/// `value` and `value_to` are `Null` while unset. `value_to` is only read by
/// range operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: String,
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: JsonValue,
    #[serde(default)]
    pub value_to: JsonValue,
}

impl Condition {
    /// Create a condition with a fresh id.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<JsonValue>) -> Self {
        Self {
            id: new_id(),
            field: field.into(),
            operator,
            value: value.into(),
            value_to: JsonValue::Null,
        }
    }

    /// Create a range condition with both bounds set.
    pub fn range(
        field: impl Into<String>,
        from: impl Into<JsonValue>,
        to: impl Into<JsonValue>,
    ) -> Self {
        Self {
            value_to: to.into(),
            ..Self::new(field, Operator::Between, from)
        }
    }

    /// Create an empty condition on the registry's first field with that
    /// field's default operator and no values.
    pub fn empty(registry: &FieldRegistry) -> Self {
        let field = registry
            .fields()
            .first()
            .map(|d| d.key.clone())
            .unwrap_or_default();
        let operator = registry.default_operator(&field).unwrap_or(Operator::Equals);

        Self {
            id: new_id(),
            field,
            operator,
            value: JsonValue::Null,
            value_to: JsonValue::Null,
        }
    }

    /// Merge a partial update into this condition.
    ///
    /// A field change resets the operator to the new field's default and
    /// clears both values, overriding anything else in the update. An
    /// operator that is not valid for the (unchanged) field is ignored.
    pub fn apply(&mut self, update: ConditionUpdate, registry: &FieldRegistry) {
        if let Some(field) = update.field
            && field != self.field
        {
            self.operator = registry.default_operator(&field).unwrap_or(Operator::Equals);
            self.field = field;
            self.value = JsonValue::Null;
            self.value_to = JsonValue::Null;
            return;
        }

        if let Some(operator) = update.operator {
            if registry.accepts_operator(&self.field, operator) {
                self.operator = operator;
            } else {
                tracing::debug!(
                    condition_id = %self.id,
                    field = %self.field,
                    operator = %operator,
                    "Ignoring operator not valid for field"
                );
            }
        }
        if let Some(value) = update.value {
            self.value = value;
        }
        if let Some(value_to) = update.value_to {
            self.value_to = value_to;
        }
    }
}

/// Partial update for [`Condition::apply`]. `None` leaves a property as is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConditionUpdate {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub value: Option<JsonValue>,
    #[serde(default)]
    pub value_to: Option<JsonValue>,
}

impl ConditionUpdate {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Default::default()
        }
    }

    pub fn operator(operator: Operator) -> Self {
        Self {
            operator: Some(operator),
            ..Default::default()
        }
    }

    pub fn value(value: impl Into<JsonValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn with_value_to(mut self, value_to: impl Into<JsonValue>) -> Self {
        self.value_to = Some(value_to.into());
        self
    }
}
