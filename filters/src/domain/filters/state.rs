//! Filter state owner
//!
//! Holds the current filter tree for one view and funnels every UI event
//! through the mutator, replacing the tree with the returned value. Calls
//! are applied in the order they arrive (last write wins).

use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::codec;
use super::condition::ConditionUpdate;
use super::evaluator;
use super::fields::FieldRegistry;
use super::group::{FilterGroup, Logic};
use super::mutator;

#[derive(Debug, Clone)]
pub struct FilterState {
    registry: Arc<FieldRegistry>,
    root: FilterGroup,
}

impl FilterState {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self {
            registry,
            root: FilterGroup::root(),
        }
    }

    /// Start from a persisted filter (see [`codec::from_value`]).
    pub fn from_persisted(registry: Arc<FieldRegistry>, raw: JsonValue) -> Self {
        Self {
            registry,
            root: codec::from_value(raw),
        }
    }

    pub fn root(&self) -> &FilterGroup {
        &self.root
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn add_condition(&mut self, target_group_id: Option<&str>) {
        self.root = mutator::add_condition(&self.root, &self.registry, target_group_id);
    }

    pub fn update_condition(&mut self, condition_id: &str, update: ConditionUpdate) {
        self.root = mutator::update_condition(&self.root, &self.registry, condition_id, update);
    }

    pub fn remove_condition(&mut self, condition_id: &str) {
        self.root = mutator::remove_condition(&self.root, condition_id);
    }

    pub fn add_group(&mut self, parent_group_id: Option<&str>) {
        self.root = mutator::add_group(&self.root, parent_group_id);
    }

    pub fn update_group_logic(&mut self, group_id: &str, logic: Logic) {
        self.root = mutator::update_group_logic(&self.root, group_id, logic);
    }

    pub fn remove_group(&mut self, group_id: &str) {
        self.root = mutator::remove_group(&self.root, group_id);
    }

    pub fn set_logic(&mut self, logic: Logic) {
        self.root = mutator::set_logic(&self.root, logic);
    }

    pub fn reset(&mut self) {
        self.root = mutator::reset(&self.root);
    }

    /// Replace the tree when switching saved views; `None` clears it.
    pub fn import_filter_group(&mut self, group: Option<FilterGroup>) {
        self.root = codec::import_filter_group(group);
    }

    pub fn export(&self) -> JsonValue {
        codec::serialize(&self.root)
    }

    /// Number of conditions in the tree ("N filters active")
    pub fn active_condition_count(&self) -> usize {
        self.root.count_conditions()
    }

    pub fn matches(&self, record: &JsonValue) -> bool {
        evaluator::evaluate_group(record, &self.root, &self.registry)
    }

    pub fn apply<'a>(&self, records: &'a [JsonValue]) -> Vec<&'a JsonValue> {
        evaluator::filter_records(records, &self.root, &self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::condition::Operator;
    use serde_json::json;

    fn state() -> FilterState {
        FilterState::new(Arc::new(FieldRegistry::leads()))
    }

    #[test]
    fn test_new_state_matches_everything() {
        let state = state();
        assert_eq!(state.root().logic, Logic::And);
        assert_eq!(state.active_condition_count(), 0);
        assert!(state.matches(&json!({"status": "lost"})));
    }

    #[test]
    fn test_build_filter_through_events() {
        let mut state = state();

        state.add_condition(None);
        let condition_id = state.root().conditions[0].id.clone();
        state.update_condition(&condition_id, ConditionUpdate::field("status"));
        state.update_condition(&condition_id, ConditionUpdate::value("new"));

        let records = vec![
            json!({"status": "new"}),
            json!({"status": "lost"}),
            json!({"status": "new"}),
        ];
        assert_eq!(state.apply(&records).len(), 2);

        state.add_group(None);
        let group_id = state.root().groups[0].id.clone();
        state.add_condition(Some(group_id.as_str()));
        let nested_id = state.root().groups[0].conditions[0].id.clone();
        state.update_condition(&nested_id, ConditionUpdate::field("status"));
        state.update_condition(&nested_id, ConditionUpdate::value("lost"));
        state.set_logic(Logic::Or);

        assert_eq!(state.active_condition_count(), 2);
        assert_eq!(state.apply(&records).len(), 3);

        state.remove_group(&group_id);
        assert_eq!(state.apply(&records).len(), 2);
    }

    #[test]
    fn test_incomplete_condition_does_not_hide_records() {
        let mut state = state();
        state.add_condition(None);
        let id = state.root().conditions[0].id.clone();
        state.update_condition(&id, ConditionUpdate::operator(Operator::Contains));

        assert!(state.matches(&json!({"first_name": "Rania"})));
        assert!(state.matches(&json!({})));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut state = state();
        state.add_condition(None);
        let before = state.root().clone();
        state.remove_group(&before.id);
        assert_eq!(state.root(), &before);

        state.reset();
        assert_eq!(state.root().id, before.id);
        assert!(state.root().is_empty());
    }

    #[test]
    fn test_update_group_logic_and_remove_condition() {
        let mut state = state();
        state.add_group(None);
        let group_id = state.root().groups[0].id.clone();
        state.update_group_logic(&group_id, Logic::And);
        assert_eq!(state.root().groups[0].logic, Logic::And);

        state.add_condition(Some(group_id.as_str()));
        let id = state.root().groups[0].conditions[0].id.clone();
        state.remove_condition(&id);
        assert_eq!(state.active_condition_count(), 0);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut state = state();
        state.add_condition(None);
        let id = state.root().conditions[0].id.clone();
        state.update_condition(&id, ConditionUpdate::value("ali"));
        let exported = state.export();

        let restored = FilterState::from_persisted(Arc::new(FieldRegistry::leads()), exported);
        assert_eq!(restored.root(), state.root());
        assert_eq!(restored.registry().fields().len(), state.registry().fields().len());

        state.import_filter_group(None);
        assert!(state.root().is_empty());
        state.import_filter_group(Some(restored.root().clone()));
        assert_eq!(state.active_condition_count(), 1);
    }
}
