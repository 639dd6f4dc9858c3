//! File-backed view store
//!
//! One pretty-printed JSON document per view, named `{id}.json`, inside a
//! single directory. Writes go through a temp file and rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::ViewStoreError;
use super::store::{ViewStore, sort_views, validate_view_id};
use super::types::SavedView;
use crate::utils::file::write_atomic;

const VIEW_FILE_EXT: &str = "json";

#[derive(Debug, Clone)]
pub struct FileViewStore {
    dir: PathBuf,
}

impl FileViewStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ViewStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened view store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn view_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, VIEW_FILE_EXT))
    }
}

impl ViewStore for FileViewStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    fn get(&self, id: &str) -> Result<Option<SavedView>, ViewStoreError> {
        validate_view_id(id)?;
        let content = match fs::read_to_string(self.view_path(id)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let view: SavedView = serde_json::from_str(&content)?;
        Ok(Some(view))
    }

    fn put(&self, view: &SavedView) -> Result<(), ViewStoreError> {
        validate_view_id(&view.id)?;
        let json = serde_json::to_vec_pretty(view)?;
        write_atomic(&self.view_path(&view.id), &json)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, ViewStoreError> {
        validate_view_id(id)?;
        match fs::remove_file(self.view_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<SavedView>, ViewStoreError> {
        let mut views = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VIEW_FILE_EXT) {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(ViewStoreError::from)
                .and_then(|content| {
                    serde_json::from_str::<SavedView>(&content).map_err(ViewStoreError::from)
                });
            match parsed {
                Ok(view) => views.push(view),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable view file");
                }
            }
        }
        sort_views(&mut views);
        Ok(views)
    }
}
