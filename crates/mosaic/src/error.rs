//! Error types for the grid engine.

use crate::item::ItemId;

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur in the grid engine.
///
/// Degenerate inputs (empty collections, unknown group labels, unparseable
/// dates) are not errors; they resolve to empty results or fallback keys.
/// The variants here signal caller bugs or invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Exclusive mode is holding more than one active group.
    #[error("filter invariant violated: exclusive mode holds {active} active groups (at most 1 allowed)")]
    InvariantViolation { active: usize },

    /// A request that only makes sense in additive mode was issued in exclusive mode.
    #[error("'{operation}' requires additive filter mode")]
    ModeMismatch { operation: &'static str },

    /// No item with the given id is in the collection.
    #[error("no item with id {0}")]
    UnknownItem(ItemId),

    /// A group attribute looked like JSON but could not be decoded.
    #[error("malformed group list '{raw}': {source}")]
    MalformedGroups {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Grid configuration could not be deserialized.
    #[error("invalid grid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl GridError {
    /// Create a malformed-groups error.
    pub fn malformed_groups(raw: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedGroups {
            raw: raw.into(),
            source,
        }
    }
}
