//! Tree mutator
//!
//! Pure edits over the filter tree. Every function takes the current root
//! and returns a new root; the input is never modified. Targets are
//! addressed by id at any depth using a depth-first, pre-order search.
//!
//! A target id that does not exist is not an error: the returned tree is
//! equal to the input and the miss is logged at debug level.

use super::condition::{Condition, ConditionUpdate};
use super::fields::FieldRegistry;
use super::group::{FilterGroup, Logic};

/// Append an empty condition to the target group (root when `None`).
pub fn add_condition(
    root: &FilterGroup,
    registry: &FieldRegistry,
    target_group_id: Option<&str>,
) -> FilterGroup {
    let mut next = root.clone();
    let target = target_group_id.unwrap_or(&root.id);

    match next.find_group_mut(target) {
        Some(group) => group.conditions.push(Condition::empty(registry)),
        None => tracing::debug!(group_id = %target, "add_condition: group not found"),
    }
    next
}

/// Merge a partial update into the condition with the given id.
///
/// See [`Condition::apply`] for the field-change reset rule.
pub fn update_condition(
    root: &FilterGroup,
    registry: &FieldRegistry,
    condition_id: &str,
    update: ConditionUpdate,
) -> FilterGroup {
    let mut next = root.clone();
    match next.find_condition_mut(condition_id) {
        Some(condition) => condition.apply(update, registry),
        None => {
            tracing::debug!(condition_id = %condition_id, "update_condition: condition not found")
        }
    }
    next
}

/// Remove the condition with the given id from whichever group owns it.
pub fn remove_condition(root: &FilterGroup, condition_id: &str) -> FilterGroup {
    let mut next = root.clone();
    if !remove_condition_in(&mut next, condition_id) {
        tracing::debug!(condition_id = %condition_id, "remove_condition: condition not found");
    }
    next
}

fn remove_condition_in(group: &mut FilterGroup, condition_id: &str) -> bool {
    if let Some(pos) = group.conditions.iter().position(|c| c.id == condition_id) {
        group.conditions.remove(pos);
        return true;
    }
    group
        .groups
        .iter_mut()
        .any(|child| remove_condition_in(child, condition_id))
}

/// Append an empty `OR` group under the parent group (root when `None`).
pub fn add_group(root: &FilterGroup, parent_group_id: Option<&str>) -> FilterGroup {
    let mut next = root.clone();
    let parent = parent_group_id.unwrap_or(&root.id);

    match next.find_group_mut(parent) {
        Some(group) => group.groups.push(FilterGroup::child()),
        None => tracing::debug!(group_id = %parent, "add_group: group not found"),
    }
    next
}

/// Set the logic of the group with the given id (root included).
pub fn update_group_logic(root: &FilterGroup, group_id: &str, logic: Logic) -> FilterGroup {
    let mut next = root.clone();
    match next.find_group_mut(group_id) {
        Some(group) => group.logic = logic,
        None => tracing::debug!(group_id = %group_id, "update_group_logic: group not found"),
    }
    next
}

/// Remove the group with the given id, and everything below it, from its
/// parent. The root itself is never removed.
pub fn remove_group(root: &FilterGroup, group_id: &str) -> FilterGroup {
    let mut next = root.clone();
    if root.id == group_id {
        tracing::debug!(group_id = %group_id, "remove_group: root group cannot be removed");
        return next;
    }
    if !remove_group_in(&mut next, group_id) {
        tracing::debug!(group_id = %group_id, "remove_group: group not found");
    }
    next
}

fn remove_group_in(group: &mut FilterGroup, group_id: &str) -> bool {
    if let Some(pos) = group.groups.iter().position(|g| g.id == group_id) {
        group.groups.remove(pos);
        return true;
    }
    group
        .groups
        .iter_mut()
        .any(|child| remove_group_in(child, group_id))
}

/// Set the root group's logic.
pub fn set_logic(root: &FilterGroup, logic: Logic) -> FilterGroup {
    FilterGroup {
        logic,
        ..root.clone()
    }
}

/// Clear every condition and child group. The root keeps its id and goes
/// back to `AND`.
pub fn reset(root: &FilterGroup) -> FilterGroup {
    FilterGroup {
        id: root.id.clone(),
        logic: Logic::And,
        conditions: Vec::new(),
        groups: Vec::new(),
    }
}
