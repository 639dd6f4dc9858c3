//! In-memory view store
//!
//! Used by tests and by callers that do not need views to outlive the
//! process.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::error::ViewStoreError;
use super::store::{ViewStore, sort_views, validate_view_id};
use super::types::SavedView;

#[derive(Debug, Default)]
pub struct InMemoryViewStore {
    views: RwLock<BTreeMap<String, SavedView>>,
}

impl InMemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.views.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.read().is_empty()
    }
}

impl ViewStore for InMemoryViewStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, id: &str) -> Result<Option<SavedView>, ViewStoreError> {
        validate_view_id(id)?;
        Ok(self.views.read().get(id).cloned())
    }

    fn put(&self, view: &SavedView) -> Result<(), ViewStoreError> {
        validate_view_id(&view.id)?;
        self.views.write().insert(view.id.clone(), view.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, ViewStoreError> {
        validate_view_id(id)?;
        Ok(self.views.write().remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<SavedView>, ViewStoreError> {
        let mut views: Vec<SavedView> = self.views.read().values().cloned().collect();
        sort_views(&mut views);
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::FilterGroup;

    #[test]
    fn test_put_get_delete() {
        let store = InMemoryViewStore::new();
        assert!(store.is_empty());

        let view = SavedView::new("hot", "Hot leads", &FilterGroup::root());
        store.put(&view).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("hot").unwrap(), Some(view));

        assert!(store.delete("hot").unwrap());
        assert!(!store.delete("hot").unwrap());
        assert_eq!(store.get("hot").unwrap(), None);
    }

    #[test]
    fn test_put_replaces() {
        let store = InMemoryViewStore::new();
        let mut view = SavedView::new("hot", "Hot leads", &FilterGroup::root());
        store.put(&view).unwrap();
        view.name = "Hottest leads".to_string();
        store.put(&view).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("hot").unwrap().unwrap().name, "Hottest leads");
    }

    #[test]
    fn test_list_sorted_by_name() {
        let store = InMemoryViewStore::new();
        for (id, name) in [("a", "Zulu"), ("b", "Alpha"), ("c", "Mike")] {
            store
                .put(&SavedView::new(id, name, &FilterGroup::root()))
                .unwrap();
        }
        let names: Vec<String> = store.list().unwrap().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["Alpha", "Mike", "Zulu"]);
    }

    #[test]
    fn test_invalid_id_rejected() {
        let store = InMemoryViewStore::new();
        let view = SavedView::new("no/slash", "Bad", &FilterGroup::root());
        assert!(matches!(
            store.put(&view),
            Err(ViewStoreError::InvalidId(_))
        ));
        assert!(store.get("").is_err());
        assert!(store.delete("a b").is_err());
    }
}
