//! Saved view types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::filters::{self, CodecLimits, FilterGroup};

/// How the record list is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Kanban,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ViewMode::Table => "table",
            ViewMode::Kanban => "kanban",
        })
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(ViewMode::Table),
            "kanban" => Ok(ViewMode::Kanban),
            _ => Err(format!(
                "Invalid view mode '{}'. Valid options: table, kanban",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// A named, persisted bundle of a filter tree and display settings.
///
/// The filter is kept as an opaque JSON blob; it is only decoded when a
/// caller asks for [`SavedView::filter_group`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub filter: JsonValue,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub shared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedView {
    pub fn new(id: impl Into<String>, name: impl Into<String>, root: &FilterGroup) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            filter: filters::serialize(root),
            columns: Vec::new(),
            sort: None,
            view_mode: ViewMode::default(),
            shared: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Decoded filter tree. A blob that is unreadable or exceeds `limits`
    /// yields an empty root.
    pub fn filter_group(&self, limits: CodecLimits) -> FilterGroup {
        filters::from_value_with(self.filter.clone(), limits)
    }

    /// Replace the stored filter and bump `updated_at`
    pub fn set_filter(&mut self, root: &FilterGroup) {
        self.filter = filters::serialize(root);
        self.updated_at = Utc::now();
    }
}
