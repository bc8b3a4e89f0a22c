//! Error types for hierarchy imports.
//!

use crate::config::ConfigurationError;
use thiserror::Error;

/// Fatal and row-level failures raised while importing a process hierarchy.
///
/// Node-level problems (duplicates, missing lineage, missing parents) are not
/// errors: they become [`crate::models::Diagnostic`] entries and disposition
/// ledger records, and the import still succeeds.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Headers or rows are missing or malformed. Aborts the import.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single row could not be turned into nodes. Recovered per row.
    #[error("Error processing row {row_index}: {message}")]
    RowProcessing { row_index: usize, message: String },

    /// No node survived extraction across the whole source.
    #[error("No valid nodes found in the source")]
    NoValidNodes,

    /// Tree construction produced an inconsistent result.
    #[error("Hierarchy build error: {0}")]
    HierarchyBuild(String),

    /// Top-level wrapper for anything not covered by a more specific variant.
    #[error("Processing error: {message}")]
    Processing { message: String },

    /// The caller cancelled the import between rows.
    #[error("Import cancelled after {rows_processed} rows")]
    Cancelled { rows_processed: usize },

    /// The level schema is unusable.
    #[error("Invalid level schema: {0}")]
    InvalidSchema(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    // Internal variants, folded into `Processing` before leaving the pipeline.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode source: {0}")]
    Decode(String),
}

impl ImportError {
    /// Create a row processing error
    pub fn row_processing(row_index: usize, message: impl Into<String>) -> Self {
        Self::RowProcessing {
            row_index,
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether this error belongs to the typed failure set returned to callers.
    pub fn is_typed(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Decode(_))
    }

    /// Rewrap internal failures as [`ImportError::Processing`], preserving the
    /// original message. Typed failures pass through unchanged.
    pub fn into_processing(self) -> Self {
        if self.is_typed() {
            self
        } else {
            Self::Processing {
                message: self.to_string(),
            }
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(error: csv::Error) -> Self {
        ImportError::Decode(error.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
