//! Saved views
//!
//! Persists named filters plus display settings behind the [`ViewStore`]
//! trait, with in-memory and directory-of-JSON-files backends.

mod error;
mod file;
mod memory;
mod store;
mod types;

pub use error::ViewStoreError;
pub use file::FileViewStore;
pub use memory::InMemoryViewStore;
pub use store::{
    MAX_VIEW_ID_LEN, ViewStore, load_filter, save_filter, validate_view_id, view_with_filter,
};
pub use types::{SavedView, SortDirection, SortSpec, ViewMode};
