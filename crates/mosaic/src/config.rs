//! Grid configuration.
//!
//! Configuration is plain data with serde support, so it can be embedded in
//! an application's own settings file or loaded from TOML directly:
//!
//! ```
//! use mosaic::{FilterMode, GridConfig};
//!
//! let config = GridConfig::from_toml_str(r#"
//!     mode = "additive"
//!     delimiter = ","
//! "#).unwrap();
//!
//! assert_eq!(config.mode, FilterMode::Additive);
//! assert_eq!(config.all_items, "all");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::FilterMode;

/// The reserved label meaning "show every item".
pub const ALL_ITEMS: &str = "all";

/// Initial state and parsing options for a [`Grid`](crate::Grid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Initial filter mode.
    pub mode: FilterMode,
    /// Initial exclusive group. `None` shows all items.
    pub group: Option<String>,
    /// Label that filter requests use to mean "all items".
    pub all_items: String,
    /// Delimiter for plain-text group attributes. `None` treats a non-JSON
    /// attribute as a single label.
    pub delimiter: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            mode: FilterMode::Exclusive,
            group: None,
            all_items: ALL_ITEMS.to_owned(),
            delimiter: None,
        }
    }
}

impl GridConfig {
    /// Parse configuration from a TOML document. Missing keys take their
    /// default values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Map a filter label to a group, treating the all-items label as `None`.
    pub fn group_for_label<'a>(&self, label: &'a str) -> Option<&'a str> {
        (label != self.all_items).then_some(label)
    }
}
