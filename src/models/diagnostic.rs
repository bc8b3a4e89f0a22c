//! Diagnostics surfaced to the UI alongside the (possibly partial) hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lineage::Lineage;
use super::node::Node;
use crate::constants::{messages, HIERARCHY_LOCATION};
use crate::schema::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    RowProcessing,
    DuplicateNode,
    InvalidLineage,
    MissingParent,
    InvalidIdFormat,
}

/// One entry of the `validations` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub location: String,
    pub row_index: usize,
    pub column: Option<String>,
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineage: Option<Lineage>,
}

/// User-facing location of a data row, e.g. `Row 4`.
pub fn row_location(row_index: usize) -> String {
    format!("Row {row_index}")
}

impl Diagnostic {
    /// A row could not be processed.
    pub fn row_error(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: DiagnosticCode::RowProcessing,
            message: message.into(),
            location: row_location(row_index),
            row_index,
            column: None,
            node_id: None,
            level: None,
            lineage: None,
        }
    }

    /// A node repeated one already accepted from an earlier row.
    pub fn duplicate(node: &Node, row_index: usize) -> Self {
        Self {
            severity: Severity::Warning,
            code: DiagnosticCode::DuplicateNode,
            message: format!("{}: {}", messages::DUPLICATE_PREFIX, node.id),
            location: row_location(row_index),
            row_index,
            column: Some("ID".to_string()),
            node_id: Some(node.id.clone()),
            level: None,
            lineage: None,
        }
    }

    /// A node arrived without lineage.
    pub fn missing_lineage(node: &Node, location: &str) -> Self {
        Self {
            severity: Severity::Error,
            code: DiagnosticCode::InvalidLineage,
            message: messages::MISSING_LINEAGE.to_string(),
            location: location.to_string(),
            row_index: node.source_row,
            column: None,
            node_id: Some(node.id.clone()),
            level: None,
            lineage: None,
        }
    }

    /// The parent named by a node's lineage is not in the tree.
    pub fn missing_parent(node: &Node) -> Self {
        Self {
            severity: Severity::Error,
            code: DiagnosticCode::MissingParent,
            message: messages::MISSING_PARENT.to_string(),
            location: HIERARCHY_LOCATION.to_string(),
            row_index: node.source_row,
            column: None,
            node_id: Some(node.id.clone()),
            level: Some(node.level),
            lineage: node.lineage.clone(),
        }
    }

    /// The tree already holds a node in this node's slot.
    pub fn slot_taken(node: &Node) -> Self {
        Self {
            severity: Severity::Warning,
            code: DiagnosticCode::DuplicateNode,
            message: format!("{}: {}", messages::SLOT_TAKEN, node.id),
            location: HIERARCHY_LOCATION.to_string(),
            row_index: node.source_row,
            column: None,
            node_id: Some(node.id.clone()),
            level: Some(node.level),
            lineage: node.lineage.clone(),
        }
    }

    /// A node id does not match its level's `id_format` template.
    pub fn invalid_id_format(node: &Node, column: &str, template: &str) -> Self {
        Self {
            severity: Severity::Warning,
            code: DiagnosticCode::InvalidIdFormat,
            message: format!("Id '{}' does not match format '{template}'", node.id),
            location: row_location(node.source_row),
            row_index: node.source_row,
            column: Some(column.to_string()),
            node_id: Some(node.id.clone()),
            level: Some(node.level),
            lineage: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{severity}] {}: {}", self.location, self.message)
    }
}
