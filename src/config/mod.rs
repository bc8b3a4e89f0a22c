//! # Import Configuration
//!
//! Tunables for a hierarchy import. Everything has a working default; a YAML
//! file and `FLOWMAP__*` environment variables can override any field.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flowmap_core::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults, then config/flowmap.yaml, then FLOWMAP__* overrides
//! let config = ConfigLoader::new()
//!     .with_file("config/flowmap.yaml")
//!     .load()?;
//!
//! let delimiter = config.csv_delimiter;
//! let limit = config.max_rows;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// What to do with a node that has no lineage when checking for duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineageFallback {
    /// Discard the node as `invalidLineage`.
    #[default]
    Reject,
    /// Compare on id and level alone, logging a warning.
    IdOnly,
}

/// Settings for one import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Deployment environment, picks the log level in
    /// [`init_structured_logging_with`](crate::logging::init_structured_logging_with).
    pub environment: String,

    /// Field delimiter for CSV sources.
    pub csv_delimiter: char,

    /// Characters separating ids in a predecessor cell.
    pub predecessor_delimiters: Vec<char>,

    pub lineage_fallback: LineageFallback,

    /// Check ids against each level's `id_format` and warn on mismatch.
    pub validate_id_formats: bool,

    /// Stop after this many data rows.
    pub max_rows: Option<usize>,

    /// Reject oversized or repeated header names of columns the schema reads.
    pub strict_headers: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            csv_delimiter: ',',
            predecessor_delimiters: vec![',', ';'],
            lineage_fallback: LineageFallback::Reject,
            validate_id_formats: false,
            max_rows: None,
            strict_headers: true,
        }
    }
}

impl ImportConfig {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.csv_delimiter.is_ascii() {
            return Err(ConfigurationError::invalid_value(
                "csv_delimiter",
                self.csv_delimiter.to_string(),
                "CSV delimiter must be a single ASCII character",
            ));
        }

        if self.predecessor_delimiters.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "predecessor_delimiters",
                "[]",
                "at least one predecessor delimiter is required",
            ));
        }

        if self.max_rows == Some(0) {
            return Err(ConfigurationError::invalid_value(
                "max_rows",
                "0",
                "max_rows must be positive when set",
            ));
        }

        Ok(())
    }

    /// CSV delimiter as the byte the decoder expects.
    pub fn csv_delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.csv_delimiter as u8
    }
}
