//! # Node Extraction
//!
//! Turns normalized rows into nodes: per-row level walking, predecessor
//! resolution, and whole-file deduplication.

pub mod accumulator;
pub mod node_extractor;
pub mod resolver;

pub use accumulator::{AcceptOutcome, AccumulatedNodes, DuplicateRecord, NodeAccumulator};
pub use node_extractor::{cell_text, NodeExtractor};
pub use resolver::{DelimitedPredecessorResolver, PredecessorResolver, RowContext};
