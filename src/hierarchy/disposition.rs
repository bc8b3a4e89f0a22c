//! Disposition ledger: the final fate of every extracted node.
//!
//! One ledger is created per import. The accumulator records duplicates and
//! lineage rejects in it, the builder records inclusions and tree-build
//! discards, and the summary is derived from it alone.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::NodeRef;

/// Why a node was left out of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscardReason {
    /// Reserved; no stage currently assigns it.
    Orphaned,
    InvalidLineage,
    Duplicates,
    MissingParent,
    Other,
}

impl DiscardReason {
    pub const ALL: [DiscardReason; 5] = [
        DiscardReason::Orphaned,
        DiscardReason::InvalidLineage,
        DiscardReason::Duplicates,
        DiscardReason::MissingParent,
        DiscardReason::Other,
    ];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispositionLedger {
    included: Vec<NodeRef>,
    discarded: BTreeMap<DiscardReason, Vec<NodeRef>>,
}

impl DispositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(&mut self, node: NodeRef) {
        self.included.push(node);
    }

    pub fn discard(&mut self, node: NodeRef, reason: DiscardReason) {
        self.discarded.entry(reason).or_default().push(node);
    }

    pub fn included(&self) -> &[NodeRef] {
        &self.included
    }

    pub fn discarded(&self, reason: DiscardReason) -> &[NodeRef] {
        self.discarded.get(&reason).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn included_count(&self) -> usize {
        self.included.len()
    }

    pub fn discarded_count(&self) -> usize {
        self.discarded.values().map(Vec::len).sum()
    }

    pub fn total(&self) -> usize {
        self.included_count() + self.discarded_count()
    }

    pub fn summary(&self) -> DispositionSummary {
        let by_reason = DiscardReason::ALL
            .iter()
            .map(|reason| (*reason, self.discarded(*reason).len()))
            .collect();
        let discarded = DiscardReason::ALL
            .iter()
            .map(|reason| (*reason, self.discarded(*reason).to_vec()))
            .collect();

        DispositionSummary {
            total_nodes: self.total(),
            included_nodes: self.included_count(),
            discarded_nodes: DiscardCounts {
                total: self.discarded_count(),
                by_reason,
            },
            details: DispositionDetails {
                total: self.total(),
                included: self.included.clone(),
                discarded,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispositionSummary {
    pub total_nodes: usize,
    pub included_nodes: usize,
    pub discarded_nodes: DiscardCounts,
    pub details: DispositionDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardCounts {
    pub total: usize,
    pub by_reason: BTreeMap<DiscardReason, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispositionDetails {
    pub total: usize,
    pub included: Vec<NodeRef>,
    pub discarded: BTreeMap<DiscardReason, Vec<NodeRef>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Level;
    use serde_json::json;

    fn node_ref(id: &str) -> NodeRef {
        NodeRef {
            id: id.to_string(),
            level: Level::ROOT,
            lineage: None,
            row_index: 2,
        }
    }

    #[test]
    fn test_accounting_balances() {
        let mut ledger = DispositionLedger::new();
        ledger.include(node_ref("A"));
        ledger.include(node_ref("B"));
        ledger.discard(node_ref("C"), DiscardReason::Duplicates);
        ledger.discard(node_ref("D"), DiscardReason::MissingParent);

        let summary = ledger.summary();
        assert_eq!(summary.total_nodes, 4);
        assert_eq!(summary.included_nodes, 2);
        assert_eq!(summary.discarded_nodes.total, 2);
        assert_eq!(
            summary.included_nodes + summary.discarded_nodes.total,
            summary.total_nodes
        );
        assert_eq!(summary.discarded_nodes.by_reason[&DiscardReason::Orphaned], 0);
        assert_eq!(summary.discarded_nodes.by_reason[&DiscardReason::Duplicates], 1);
    }

    #[test]
    fn test_summary_lists_every_bucket() {
        let value = serde_json::to_value(DispositionLedger::new().summary()).unwrap();
        assert_eq!(
            value["discardedNodes"]["byReason"],
            json!({
                "orphaned": 0,
                "invalidLineage": 0,
                "duplicates": 0,
                "missingParent": 0,
                "other": 0
            })
        );
        assert_eq!(value["details"]["discarded"]["missingParent"], json!([]));
    }
}
