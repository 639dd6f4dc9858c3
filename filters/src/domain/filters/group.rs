//! Group model
//!
//! A group combines its conditions and child groups under one boolean
//! operator. The whole filter is a single root group.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::new_id;

/// Boolean operator of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Logic {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => write!(f, "AND"),
            Logic::Or => write!(f, "OR"),
        }
    }
}

/// A node of the filter tree.
///
/// Ids are unique across the whole tree; no node appears twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub id: String,
    #[serde(default)]
    pub logic: Logic,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
}

impl FilterGroup {
    /// Fresh empty root: `AND`, no children
    pub fn root() -> Self {
        Self::with_logic(Logic::And)
    }

    /// Fresh empty child group. Children default to `OR` so a nested group
    /// reads as "any of these alternatives".
    pub fn child() -> Self {
        Self::with_logic(Logic::Or)
    }

    pub fn with_logic(logic: Logic) -> Self {
        Self {
            id: new_id(),
            logic,
            conditions: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_group(mut self, group: FilterGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// No conditions and no child groups
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.groups.is_empty()
    }

    /// Number of conditions in this group and all descendants
    pub fn count_conditions(&self) -> usize {
        self.conditions.len()
            + self
                .groups
                .iter()
                .map(FilterGroup::count_conditions)
                .sum::<usize>()
    }

    /// Nesting depth; a group without children has depth 1
    pub fn depth(&self) -> usize {
        1 + self.groups.iter().map(FilterGroup::depth).max().unwrap_or(0)
    }

    /// Depth-first, pre-order search for a group by id (self included)
    pub fn find_group(&self, id: &str) -> Option<&FilterGroup> {
        if self.id == id {
            return Some(self);
        }
        self.groups.iter().find_map(|child| child.find_group(id))
    }

    pub(crate) fn find_group_mut(&mut self, id: &str) -> Option<&mut FilterGroup> {
        if self.id == id {
            return Some(self);
        }
        self.groups
            .iter_mut()
            .find_map(|child| child.find_group_mut(id))
    }

    /// Depth-first, pre-order search for a condition by id
    pub fn find_condition(&self, id: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.id == id)
            .or_else(|| self.groups.iter().find_map(|child| child.find_condition(id)))
    }

    pub(crate) fn find_condition_mut(&mut self, id: &str) -> Option<&mut Condition> {
        if let Some(pos) = self.conditions.iter().position(|c| c.id == id) {
            return Some(&mut self.conditions[pos]);
        }
        self.groups
            .iter_mut()
            .find_map(|child| child.find_condition_mut(id))
    }

    /// First id (group or condition) that occurs more than once, or an
    /// empty id, in pre-order
    pub fn first_invalid_id(&self) -> Option<String> {
        let mut seen = HashSet::new();
        self.first_invalid_id_inner(&mut seen)
    }

    fn first_invalid_id_inner<'a>(&'a self, seen: &mut HashSet<&'a str>) -> Option<String> {
        if self.id.is_empty() || !seen.insert(self.id.as_str()) {
            return Some(self.id.clone());
        }
        for condition in &self.conditions {
            if condition.id.is_empty() || !seen.insert(condition.id.as_str()) {
                return Some(condition.id.clone());
            }
        }
        self.groups
            .iter()
            .find_map(|child| child.first_invalid_id_inner(seen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::condition::Operator;
    use serde_json::json;

    fn sample_tree() -> FilterGroup {
        let mut inner = FilterGroup::child();
        inner.id = "g2".to_string();
        let mut c3 = Condition::new("country_code", Operator::Equals, "AE");
        c3.id = "c3".to_string();
        inner.conditions.push(c3);

        let mut mid = FilterGroup::child();
        mid.id = "g1".to_string();
        let mut c2 = Condition::new("status", Operator::Equals, "new");
        c2.id = "c2".to_string();
        mid.conditions.push(c2);
        mid.groups.push(inner);

        let mut root = FilterGroup::root();
        root.id = "root".to_string();
        let mut c1 = Condition::new("first_name", Operator::Contains, "al");
        c1.id = "c1".to_string();
        root.conditions.push(c1);
        root.groups.push(mid);
        root
    }

    #[test]
    fn test_root_and_child_defaults() {
        let root = FilterGroup::root();
        assert_eq!(root.logic, Logic::And);
        assert!(root.is_empty());

        let child = FilterGroup::child();
        assert_eq!(child.logic, Logic::Or);
        assert_ne!(root.id, child.id);
    }

    #[test]
    fn test_logic_serde() {
        assert_eq!(serde_json::to_value(Logic::And).unwrap(), json!("AND"));
        assert_eq!(serde_json::to_value(Logic::Or).unwrap(), json!("OR"));
        let logic: Logic = serde_json::from_value(json!("or")).unwrap();
        assert_eq!(logic, Logic::Or);
    }

    #[test]
    fn test_count_and_depth() {
        let tree = sample_tree();
        assert_eq!(tree.count_conditions(), 3);
        assert_eq!(tree.depth(), 3);
        assert_eq!(FilterGroup::root().depth(), 1);
    }

    #[test]
    fn test_find_group_any_depth() {
        let tree = sample_tree();
        assert_eq!(tree.find_group("root").map(|g| g.id.as_str()), Some("root"));
        assert_eq!(tree.find_group("g2").map(|g| g.id.as_str()), Some("g2"));
        assert!(tree.find_group("missing").is_none());
    }

    #[test]
    fn test_find_condition_any_depth() {
        let tree = sample_tree();
        assert_eq!(
            tree.find_condition("c3").map(|c| c.field.as_str()),
            Some("country_code")
        );
        assert!(tree.find_condition("g1").is_none());
    }

    #[test]
    fn test_first_invalid_id_detects_duplicates() {
        let mut tree = sample_tree();
        assert_eq!(tree.first_invalid_id(), None);

        tree.groups[0].groups[0].conditions[0].id = "c1".to_string();
        assert_eq!(tree.first_invalid_id(), Some("c1".to_string()));
    }

    #[test]
    fn test_first_invalid_id_detects_group_condition_clash() {
        let mut tree = sample_tree();
        tree.groups[0].id = "c1".to_string();
        assert_eq!(tree.first_invalid_id(), Some("c1".to_string()));
    }

    #[test]
    fn test_first_invalid_id_detects_empty() {
        let mut tree = sample_tree();
        tree.groups[0].conditions[0].id = String::new();
        assert_eq!(tree.first_invalid_id(), Some(String::new()));
    }
}
