//! # Hierarchy Construction
//!
//! Tree building from the deduplicated node list, and the disposition ledger
//! that records what happened to every node.

pub mod builder;
pub mod disposition;

pub use builder::{build_hierarchy, HierarchyBuild, HierarchyBuilder};
pub use disposition::{
    DiscardCounts, DiscardReason, DispositionDetails, DispositionLedger, DispositionSummary,
};
