//! # Disposition Reporting
//!
//! Per-level counts, duplicate reports and the disposition summary returned
//! alongside the hierarchy.

pub mod summary;

pub use summary::{nodes_per_level, DuplicateNodeReport, ImportSummary};
