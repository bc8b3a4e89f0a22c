//! # Data Model
//!
//! Value types shared by every stage of an import: extracted nodes and their
//! identity keys, lineage, diagnostics, and the nested hierarchy tree.

pub mod diagnostic;
pub mod hierarchy;
pub mod lineage;
pub mod node;

pub use diagnostic::{row_location, Diagnostic, DiagnosticCode, Severity};
pub use hierarchy::{Children, Hierarchy, HierarchyNode};
pub use lineage::Lineage;
pub use node::{Node, NodeKey, NodeRef};
