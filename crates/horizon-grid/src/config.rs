//! Table configuration.
//!
//! Tables are usually configured in code, but the same settings can be read
//! from TOML:
//!
//! ```toml
//! rows_per_page = 10
//! pagination_controls = true
//! request_map_key = "row"
//! sort_levels = 3
//! ```
//!
//! Missing keys take their defaults.

use std::path::Path;

use horizon_grid_core::{GridError, Result};
use serde::{Deserialize, Serialize};

use crate::model::{DEFAULT_REQUEST_KEY, DEFAULT_ROWS_PER_PAGE};

/// Number of levels a custom sort panel offers.
pub const DEFAULT_SORT_LEVELS: usize = 3;

/// Settings shared by every row group of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page for row groups that do not set their own.
    pub rows_per_page: usize,
    /// Whether row groups start paginated.
    pub pagination_controls: bool,
    /// Scope key that criteria built by the table publish rows under.
    pub request_map_key: String,
    /// Maximum number of sort panel levels applied.
    pub sort_levels: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            pagination_controls: false,
            request_map_key: DEFAULT_REQUEST_KEY.to_string(),
            sort_levels: DEFAULT_SORT_LEVELS,
        }
    }
}

impl TableConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| GridError::Config(e.to_string()))
    }

    /// Reads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GridError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Renders the configuration as TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| GridError::Config(e.to_string()))
    }
}
