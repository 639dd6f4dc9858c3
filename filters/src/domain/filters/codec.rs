//! Filter serialization
//!
//! Converts the filter tree to and from a storage-safe JSON value. The
//! encoding is a structural, order-preserving dump with ids included so
//! they stay stable across reloads.
//!
//! Decoding never fails from the caller's point of view: corrupt or
//! oversized input yields a fresh empty root. [`try_deserialize`] exposes
//! the underlying error for callers that want to report it.

use serde_json::Value as JsonValue;

use super::error::FilterError;
use super::group::FilterGroup;

/// Maximum size of a persisted filter in bytes (64KB)
pub const DEFAULT_MAX_FILTER_BYTES: usize = 64 * 1024;

/// Maximum nesting depth of a persisted filter
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Guards applied when decoding persisted filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    pub max_bytes: usize,
    pub max_depth: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_FILTER_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Encode a filter tree as JSON.
pub fn serialize(root: &FilterGroup) -> JsonValue {
    serde_json::to_value(root).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize filter, storing null");
        JsonValue::Null
    })
}

/// Encode a filter tree as a JSON string.
pub fn to_json_string(root: &FilterGroup) -> String {
    serialize(root).to_string()
}

/// Decode a filter tree from a JSON string, reporting why it was rejected.
pub fn try_deserialize(raw: &str, limits: CodecLimits) -> Result<FilterGroup, FilterError> {
    if raw.len() > limits.max_bytes {
        return Err(FilterError::TooLarge {
            size: raw.len(),
            max: limits.max_bytes,
        });
    }
    let root: FilterGroup = serde_json::from_str(raw)?;
    validate(root, limits)
}

/// Decode a filter tree from an already-parsed JSON value. The size limit
/// applies to the value's compact JSON encoding.
pub fn try_from_value(value: JsonValue, limits: CodecLimits) -> Result<FilterGroup, FilterError> {
    let size = value.to_string().len();
    if size > limits.max_bytes {
        return Err(FilterError::TooLarge {
            size,
            max: limits.max_bytes,
        });
    }
    let root: FilterGroup = serde_json::from_value(value)?;
    validate(root, limits)
}

fn validate(root: FilterGroup, limits: CodecLimits) -> Result<FilterGroup, FilterError> {
    if root.depth() > limits.max_depth {
        return Err(FilterError::TooDeep {
            max: limits.max_depth,
        });
    }
    if let Some(id) = root.first_invalid_id() {
        return Err(FilterError::DuplicateId(id));
    }
    Ok(root)
}

/// Decode a filter tree from a JSON string with the default limits.
///
/// Any failure yields a fresh empty root.
pub fn deserialize(raw: &str) -> FilterGroup {
    deserialize_with(raw, CodecLimits::default())
}

/// Decode a filter tree from a JSON string. Any failure yields a fresh
/// empty root.
pub fn deserialize_with(raw: &str, limits: CodecLimits) -> FilterGroup {
    try_deserialize(raw, limits).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Discarding unreadable filter, starting from empty");
        FilterGroup::root()
    })
}

/// Decode a filter tree from a JSON value with the default limits. `null`
/// and any failure yield a fresh empty root.
pub fn from_value(value: JsonValue) -> FilterGroup {
    from_value_with(value, CodecLimits::default())
}

/// Decode a filter tree from a JSON value. `null` and any failure yield a
/// fresh empty root.
pub fn from_value_with(value: JsonValue, limits: CodecLimits) -> FilterGroup {
    if value.is_null() {
        return FilterGroup::root();
    }
    try_from_value(value, limits).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Discarding unreadable filter, starting from empty");
        FilterGroup::root()
    })
}

/// Adopt a group as the new root, or start from an empty root when there
/// is none. A group that breaks the tree invariants is discarded too.
pub fn import_filter_group(group: Option<FilterGroup>) -> FilterGroup {
    match group {
        Some(group) => validate(group, CodecLimits::default()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Rejecting imported filter, starting from empty");
            FilterGroup::root()
        }),
        None => FilterGroup::root(),
    }
}
