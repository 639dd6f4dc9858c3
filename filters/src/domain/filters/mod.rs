//! Advanced filter engine
//!
//! A user-composable boolean expression tree (nested AND/OR groups of field
//! conditions) that is edited incrementally, evaluated in memory against
//! records, and persisted inside saved views.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use fleetdesk_filters::domain::filters::{ConditionUpdate, FieldRegistry, FilterState};
//! use serde_json::json;
//!
//! let mut state = FilterState::new(Arc::new(FieldRegistry::leads()));
//! state.add_condition(None);
//! let id = state.root().conditions[0].id.clone();
//! state.update_condition(&id, ConditionUpdate::field("status"));
//! state.update_condition(&id, ConditionUpdate::value("new"));
//!
//! assert!(state.matches(&json!({"status": "new"})));
//! assert!(!state.matches(&json!({"status": "lost"})));
//! ```

mod codec;
mod condition;
mod error;
mod evaluator;
mod fields;
mod group;
mod mutator;
mod state;

pub use codec::{
    CodecLimits, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILTER_BYTES, deserialize, deserialize_with,
    from_value, from_value_with, import_filter_group, serialize, to_json_string, try_deserialize,
    try_from_value,
};
pub use condition::{Condition, ConditionUpdate, Operator};
pub use error::FilterError;
pub use evaluator::{count_matches, evaluate_condition, evaluate_group, filter_records};
pub use fields::{
    FieldDescriptor, FieldRegistry, FieldType, OptionSource, ReferenceOption, SelectOption,
};
pub use group::{FilterGroup, Logic};
pub use mutator::{
    add_condition, add_group, remove_condition, remove_group, reset, set_logic, update_condition,
    update_group_logic,
};
pub use state::FilterState;

/// Fresh opaque node id
fn new_id() -> String {
    cuid2::create_id()
}
