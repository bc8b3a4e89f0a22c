//! # Import Pipeline
//!
//! Row Normalizer, then Node Extractor with whole-file deduplication per row,
//! then Hierarchy Builder, then summary assembly.

pub mod cancellation;
pub mod processor;

pub use cancellation::CancellationFlag;
pub use processor::{process_source, ImportOutcome, ImportProcessor};
