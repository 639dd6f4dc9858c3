//! Field registry
//!
//! Static metadata for every filterable field: its semantic type (which
//! decides the operator set and comparison rules) and, for select fields,
//! where the selectable options come from.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::Operator;

/// Semantic type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    MultiSelect,
}

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::Contains,
    Operator::NotContains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const NUMBER_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::GreaterThanOrEquals,
    Operator::LessThanOrEquals,
    Operator::Between,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const DATE_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::Between,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::Equals];

const SELECT_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const MULTI_SELECT_OPERATORS: &[Operator] = &[Operator::In, Operator::NotIn];

impl FieldType {
    /// Valid operators in UI display order. The first one is the default.
    pub fn operators(self) -> &'static [Operator] {
        match self {
            Self::Text => TEXT_OPERATORS,
            Self::Number => NUMBER_OPERATORS,
            Self::Date => DATE_OPERATORS,
            Self::Boolean => BOOLEAN_OPERATORS,
            Self::Select => SELECT_OPERATORS,
            Self::MultiSelect => MULTI_SELECT_OPERATORS,
        }
    }

    /// Whether a condition on this type may use `operator`.
    ///
    /// Every listed operator is accepted. Select fields also take the
    /// membership operators (`in`, `not_in`) so one condition can match
    /// "any of" several options.
    pub fn accepts(self, operator: Operator) -> bool {
        self.operators().contains(&operator)
            || (self == Self::Select && matches!(operator, Operator::In | Operator::NotIn))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable option as presented to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// An entry of an externally supplied reference list (countries, currencies)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub code: String,
    pub label: String,
}

/// Where a select field's options come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    /// Options compiled into the registry
    Static(Vec<SelectOption>),
    /// Options resolved from a named reference list injected at runtime
    Reference(String),
}

/// Metadata for one filterable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Record attribute path, dot-separated for nested attributes
    pub key: String,
    pub label: String,
    pub field_type: FieldType,
    pub options: Option<OptionSource>,
}

impl FieldDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            options: None,
        }
    }

    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        let options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect();
        self.options = Some(OptionSource::Static(options));
        self
    }

    pub fn with_reference(mut self, list: impl Into<String>) -> Self {
        self.options = Some(OptionSource::Reference(list.into()));
        self
    }
}

/// Lookup table of filterable fields.
///
/// Field order is significant: the first field is the default for new
/// conditions and the order is the UI picker order.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    references: HashMap<String, Vec<ReferenceOption>>,
}

impl FieldRegistry {
    /// Build a registry. Later descriptors reusing an earlier key are dropped.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        let mut unique: Vec<FieldDescriptor> = Vec::with_capacity(fields.len());
        for descriptor in fields {
            if unique.iter().any(|d| d.key == descriptor.key) {
                tracing::warn!(field = %descriptor.key, "Duplicate field key in registry, ignoring");
                continue;
            }
            unique.push(descriptor);
        }
        Self {
            fields: unique,
            references: HashMap::new(),
        }
    }

    /// Registry of the CRM lead fields
    pub fn leads() -> Self {
        use FieldType::*;

        Self::new(vec![
            FieldDescriptor::new("first_name", "First name", Text),
            FieldDescriptor::new("last_name", "Last name", Text),
            FieldDescriptor::new("email", "Email", Text),
            FieldDescriptor::new("phone", "Phone", Text),
            FieldDescriptor::new("company_name", "Company", Text),
            FieldDescriptor::new("status", "Status", Select).with_options(&[
                ("new", "New"),
                ("contacted", "Contacted"),
                ("qualified", "Qualified"),
                ("demo", "Demo scheduled"),
                ("proposal", "Proposal sent"),
                ("negotiation", "Negotiation"),
                ("won", "Won"),
                ("lost", "Lost"),
            ]),
            FieldDescriptor::new("source", "Source", Select).with_options(&[
                ("website", "Website"),
                ("referral", "Referral"),
                ("cold_call", "Cold call"),
                ("trade_show", "Trade show"),
                ("partner", "Partner"),
                ("social_media", "Social media"),
                ("other", "Other"),
            ]),
            FieldDescriptor::new("country_code", "Country", Select).with_reference("countries"),
            FieldDescriptor::new("city", "City", Text),
            FieldDescriptor::new("fleet_size", "Fleet size", Number),
            FieldDescriptor::new("qualification_score", "Qualification score", Number),
            FieldDescriptor::new("estimated_value", "Estimated value", Number),
            FieldDescriptor::new("created_at", "Created", Date),
            FieldDescriptor::new("updated_at", "Updated", Date),
            FieldDescriptor::new("next_follow_up_at", "Next follow-up", Date),
            FieldDescriptor::new("is_qualified", "Qualified", Boolean),
            FieldDescriptor::new("vehicle_types", "Vehicle types", MultiSelect).with_options(&[
                ("trucks", "Trucks"),
                ("vans", "Vans"),
                ("cars", "Cars"),
                ("buses", "Buses"),
                ("motorcycles", "Motorcycles"),
                ("heavy_equipment", "Heavy equipment"),
            ]),
            FieldDescriptor::new("assigned_to.first_name", "Assigned to", Text),
        ])
    }

    /// Inject a named reference list used by `OptionSource::Reference` fields
    pub fn with_reference_list(
        mut self,
        name: impl Into<String>,
        options: Vec<ReferenceOption>,
    ) -> Self {
        self.references.insert(name.into(), options);
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn descriptor(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|d| d.key == key)
    }

    /// Semantic type of a field. Unknown fields report `Text`.
    pub fn field_type(&self, key: &str) -> FieldType {
        self.descriptor(key)
            .map(|d| d.field_type)
            .unwrap_or(FieldType::Text)
    }

    /// Valid operators for a field. Unknown fields have none.
    pub fn operators_for_field(&self, key: &str) -> &'static [Operator] {
        self.descriptor(key)
            .map(|d| d.field_type.operators())
            .unwrap_or(&[])
    }

    /// Whether `operator` may be used on a field. Unknown fields accept none.
    pub fn accepts_operator(&self, key: &str, operator: Operator) -> bool {
        self.descriptor(key)
            .is_some_and(|d| d.field_type.accepts(operator))
    }

    pub fn default_operator(&self, key: &str) -> Option<Operator> {
        self.operators_for_field(key).first().copied()
    }

    /// Selectable options for a field, resolving reference lists.
    ///
    /// Non-select fields and unresolved reference lists yield no options.
    pub fn select_options(&self, key: &str) -> Vec<SelectOption> {
        match self.descriptor(key).and_then(|d| d.options.as_ref()) {
            Some(OptionSource::Static(options)) => options.clone(),
            Some(OptionSource::Reference(list)) => self
                .references
                .get(list)
                .map(|entries| {
                    entries
                        .iter()
                        .map(|entry| SelectOption {
                            value: entry.code.clone(),
                            label: entry.label.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }
}
