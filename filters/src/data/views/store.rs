//! Saved view store trait

use super::error::ViewStoreError;
use super::types::SavedView;
use crate::domain::filters::{CodecLimits, FilterGroup};

/// Maximum length of a view id
pub const MAX_VIEW_ID_LEN: usize = 128;

/// Key/value store of saved views keyed by view id
pub trait ViewStore: Send + Sync {
    /// Backend name for logging
    fn backend_name(&self) -> &'static str;

    fn get(&self, id: &str) -> Result<Option<SavedView>, ViewStoreError>;

    /// Insert or replace a view
    fn put(&self, view: &SavedView) -> Result<(), ViewStoreError>;

    /// Delete a view. Returns whether it existed.
    fn delete(&self, id: &str) -> Result<bool, ViewStoreError>;

    /// All views, ordered by name then id
    fn list(&self) -> Result<Vec<SavedView>, ViewStoreError>;
}

/// Check a view id: 1-128 chars of ASCII letters, digits, `-`, `_`
pub fn validate_view_id(id: &str) -> Result<(), ViewStoreError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_VIEW_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ViewStoreError::InvalidId(id.to_string()))
    }
}

/// The stored view with its filter replaced by `root`, or a new view named
/// after its id. Nothing is written.
pub fn view_with_filter(
    store: &dyn ViewStore,
    view_id: &str,
    root: &FilterGroup,
) -> Result<SavedView, ViewStoreError> {
    Ok(match store.get(view_id)? {
        Some(mut view) => {
            view.set_filter(root);
            view
        }
        None => SavedView::new(view_id, view_id, root),
    })
}

/// Store a filter under a view id, creating the view if needed.
pub fn save_filter(
    store: &dyn ViewStore,
    view_id: &str,
    root: &FilterGroup,
) -> Result<SavedView, ViewStoreError> {
    let view = view_with_filter(store, view_id, root)?;
    store.put(&view)?;
    tracing::debug!(
        view_id = %view_id,
        backend = store.backend_name(),
        conditions = root.count_conditions(),
        "Saved filter"
    );
    Ok(view)
}

/// Load the filter stored under a view id, decoded within `limits`.
///
/// A missing view, a store error, an unreadable filter or one that exceeds
/// the limits all yield an empty root.
pub fn load_filter(store: &dyn ViewStore, view_id: &str, limits: CodecLimits) -> FilterGroup {
    match store.get(view_id) {
        Ok(Some(view)) => view.filter_group(limits),
        Ok(None) => {
            tracing::debug!(view_id = %view_id, "No saved view, starting from empty filter");
            FilterGroup::root()
        }
        Err(e) => {
            tracing::warn!(view_id = %view_id, error = %e, "Failed to load saved view, starting from empty filter");
            FilterGroup::root()
        }
    }
}

/// Sort views by name, then id
pub(crate) fn sort_views(views: &mut [SavedView]) {
    views.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::views::InMemoryViewStore;
    use crate::domain::filters::{Condition, Operator};

    #[test]
    fn test_validate_view_id() {
        assert!(validate_view_id("hot-leads_2024").is_ok());
        assert!(validate_view_id("").is_err());
        assert!(validate_view_id("../secrets").is_err());
        assert!(validate_view_id("has space").is_err());
        assert!(validate_view_id(&"a".repeat(MAX_VIEW_ID_LEN)).is_ok());
        assert!(validate_view_id(&"a".repeat(MAX_VIEW_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_save_then_load_filter() {
        let store = InMemoryViewStore::new();
        let root = FilterGroup::root().with_condition(Condition::new(
            "status",
            Operator::Equals,
            "new",
        ));

        let view = save_filter(&store, "new-leads", &root).unwrap();
        assert_eq!(view.name, "new-leads");
        assert_eq!(load_filter(&store, "new-leads", CodecLimits::default()), root);
    }

    #[test]
    fn test_save_filter_keeps_view_settings() {
        let store = InMemoryViewStore::new();
        let mut view = SavedView::new("pipeline", "Pipeline", &FilterGroup::root());
        view.columns = vec!["first_name".to_string(), "status".to_string()];
        store.put(&view).unwrap();

        let root = FilterGroup::root().with_condition(Condition::new(
            "fleet_size",
            Operator::GreaterThan,
            10,
        ));
        let saved = save_filter(&store, "pipeline", &root).unwrap();
        assert_eq!(saved.name, "Pipeline");
        assert_eq!(saved.columns.len(), 2);
        assert_eq!(saved.created_at, view.created_at);
        assert_eq!(load_filter(&store, "pipeline", CodecLimits::default()), root);
    }

    #[test]
    fn test_view_with_filter_does_not_write() {
        let store = InMemoryViewStore::new();
        let root = FilterGroup::root().with_condition(Condition::new(
            "status",
            Operator::Equals,
            "won",
        ));
        let view = view_with_filter(&store, "won", &root).unwrap();
        assert_eq!(view.name, "won");
        assert!(store.get("won").unwrap().is_none());

        let mut existing = SavedView::new("won", "Won deals", &FilterGroup::root());
        existing.shared = true;
        store.put(&existing).unwrap();
        let view = view_with_filter(&store, "won", &root).unwrap();
        assert_eq!(view.name, "Won deals");
        assert!(view.shared);
        assert_eq!(view.filter_group(CodecLimits::default()), root);
    }

    #[test]
    fn test_load_filter_over_limits_is_empty() {
        let store = InMemoryViewStore::new();
        let root = FilterGroup::root().with_group(FilterGroup::child().with_condition(
            Condition::new("status", Operator::Equals, "new"),
        ));
        save_filter(&store, "deep", &root).unwrap();

        let shallow = CodecLimits {
            max_depth: 1,
            ..Default::default()
        };
        let tiny = CodecLimits {
            max_bytes: 16,
            ..Default::default()
        };
        assert!(load_filter(&store, "deep", shallow).is_empty());
        assert!(load_filter(&store, "deep", tiny).is_empty());
        assert_eq!(load_filter(&store, "deep", CodecLimits::default()), root);
    }

    #[test]
    fn test_load_missing_view_is_empty() {
        let store = InMemoryViewStore::new();
        assert!(load_filter(&store, "missing", CodecLimits::default()).is_empty());
    }

    #[test]
    fn test_load_invalid_id_is_empty() {
        let store = InMemoryViewStore::new();
        assert!(load_filter(&store, "../nope", CodecLimits::default()).is_empty());
    }

    #[test]
    fn test_save_rejects_invalid_id() {
        let store = InMemoryViewStore::new();
        let result = save_filter(&store, "bad id", &FilterGroup::root());
        assert!(matches!(result, Err(ViewStoreError::InvalidId(_))));
    }
}
