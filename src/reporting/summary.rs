//! Import summary handed to the UI layer next to the tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::extraction::DuplicateRecord;
use crate::hierarchy::DispositionSummary;
use crate::models::{Diagnostic, Lineage, Node};
use crate::schema::Level;

/// A duplicate annotated with a readable lineage path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateNodeReport {
    pub id: String,
    pub level: Level,
    pub lineage: Option<Lineage>,
    pub row_index: usize,
    pub lineage_string: String,
}

impl From<&DuplicateRecord> for DuplicateNodeReport {
    fn from(record: &DuplicateRecord) -> Self {
        Self {
            id: record.id.clone(),
            level: record.level,
            lineage: record.lineage.clone(),
            row_index: record.row_index,
            lineage_string: record
                .lineage
                .as_ref()
                .map(Lineage::to_display_string)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_nodes: usize,
    pub nodes_per_level: BTreeMap<Level, usize>,
    pub validations: Vec<Diagnostic>,
    pub orphan_nodes: usize,
    pub duplicate_nodes: Vec<DuplicateNodeReport>,
    pub disposition_summary: DispositionSummary,
}

impl ImportSummary {
    /// Assemble the summary from the accepted nodes and the build results.
    pub fn assemble(
        nodes: &[Node],
        validations: &[Diagnostic],
        orphan_count: usize,
        duplicates: &[DuplicateRecord],
        disposition_summary: DispositionSummary,
    ) -> Self {
        Self {
            total_nodes: nodes.len(),
            nodes_per_level: nodes_per_level(nodes),
            validations: validations.to_vec(),
            orphan_nodes: orphan_count,
            duplicate_nodes: duplicates.iter().map(DuplicateNodeReport::from).collect(),
            disposition_summary,
        }
    }

    pub fn error_count(&self) -> usize {
        self.validations.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.validations.len() - self.error_count()
    }
}

/// Histogram of nodes by level. Levels with no nodes are omitted.
pub fn nodes_per_level(nodes: &[Node]) -> BTreeMap<Level, usize> {
    let mut counts = BTreeMap::new();
    for node in nodes {
        *counts.entry(node.level).or_insert(0) += 1;
    }
    counts
}
