#![allow(clippy::doc_markdown)] // Allow technical terms like CSV, YAML in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Flowmap Core
//!
//! Hierarchy construction and validation engine for tabular business-process
//! data.
//!
//! ## Overview
//!
//! Process hierarchies (domain, line of business, journey, process area,
//! process, step) usually arrive as flat, denormalized rows in which every row
//! repeats the ids of all its ancestors. Flowmap Core turns those rows into a
//! validated tree, detecting duplicates, orphans and missing lineage, and
//! reports what happened to every node.
//!
//! ## Architecture
//!
//! ```text
//! SourceData ──► RowNormalizer ──► NodeExtractor ──► NodeAccumulator
//!                                  (per row)         (whole file)
//!                                                         │
//!            ImportSummary ◄── HierarchyBuilder ◄─────────┘
//! ```
//!
//! Node identity is lineage-aware: two nodes are the same only if id, level
//! and every ancestor id match. A single disposition ledger per import records
//! whether each extracted node was included in the tree or discarded, and why.
//!
//! ## Module Organization
//!
//! - [`schema`] - Level tags and caller-supplied level definitions
//! - [`ingest`] - Source decoding and row normalisation
//! - [`extraction`] - Per-row node extraction and whole-file deduplication
//! - [`hierarchy`] - Tree building and the disposition ledger
//! - [`reporting`] - Import summary assembly
//! - [`pipeline`] - End-to-end import orchestration and cancellation
//! - [`models`] - Nodes, lineage, diagnostics and the hierarchy tree
//! - [`config`] - Import configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowmap_core::extraction::DelimitedPredecessorResolver;
//! use flowmap_core::ingest::SourceData;
//! use flowmap_core::pipeline::process_source;
//! use flowmap_core::schema::{Level, LevelDefinition, LevelSchema};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = LevelSchema::new(vec![
//!     LevelDefinition::new(Level::ROOT, "L0_ID", "L0_Name"),
//!     LevelDefinition::new("L1".parse()?, "L1_ID", "L1_Name"),
//! ])?;
//!
//! let source = SourceData::Grid(vec![
//!     vec![json!("L0_ID"), json!("L0_Name"), json!("L1_ID"), json!("L1_Name")],
//!     vec![json!("D1"), json!("Domain One"), json!("L1"), json!("Lob One")],
//! ]);
//!
//! let outcome = process_source(source, &schema, &DelimitedPredecessorResolver::default())?;
//! println!("{}", serde_json::to_string_pretty(&outcome.hierarchy)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod hierarchy;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod reporting;
pub mod schema;
pub mod validation;

pub use config::{ConfigLoader, ConfigurationError, ImportConfig, LineageFallback};
pub use error::{ImportError, ImportResult};
pub use extraction::{DelimitedPredecessorResolver, PredecessorResolver, RowContext};
pub use hierarchy::{build_hierarchy, DiscardReason, DispositionLedger, DispositionSummary};
pub use ingest::{CsvGridDecoder, GridDecoder, RecordSource, SourceData, StaticRecordSource};
pub use logging::{init_structured_logging, init_structured_logging_with};
pub use models::{Diagnostic, DiagnosticCode, Hierarchy, HierarchyNode, Lineage, Node, NodeKey, Severity};
pub use pipeline::{process_source, CancellationFlag, ImportOutcome, ImportProcessor};
pub use reporting::ImportSummary;
pub use schema::{Level, LevelDefinition, LevelSchema};
