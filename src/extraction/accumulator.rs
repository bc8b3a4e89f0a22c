//! Whole-file deduplication.
//!
//! [`NodeAccumulator`] is the explicit running state of one import: the
//! accepted nodes, the duplicates seen so far, the diagnostics raised, and the
//! disposition ledger. It is owned by a single import and threaded through
//! every row.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::config::LineageFallback;
use crate::constants::operations;
use crate::hierarchy::{DiscardReason, DispositionLedger};
use crate::models::{row_location, Diagnostic, Lineage, Node, NodeKey};
use crate::schema::Level;

/// A node dropped because an identical one was accepted from an earlier row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRecord {
    pub id: String,
    pub level: Level,
    pub lineage: Option<Lineage>,
    pub row_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    Accepted,
    Duplicate,
    Rejected,
}

#[derive(Debug, Default)]
pub struct NodeAccumulator {
    fallback: LineageFallback,
    nodes: Vec<Node>,
    keys: HashSet<NodeKey>,
    id_only_keys: HashSet<NodeKey>,
    duplicates: Vec<DuplicateRecord>,
    diagnostics: Vec<Diagnostic>,
    ledger: DispositionLedger,
}

/// Everything an accumulator collected, once all rows are in.
#[derive(Debug)]
pub struct AccumulatedNodes {
    pub nodes: Vec<Node>,
    pub duplicates: Vec<DuplicateRecord>,
    pub diagnostics: Vec<Diagnostic>,
    pub ledger: DispositionLedger,
}

impl NodeAccumulator {
    pub fn new(fallback: LineageFallback) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    /// Offer one extracted node.
    pub fn accept(&mut self, node: Node) -> AcceptOutcome {
        let row_index = node.source_row;

        let key = if node.has_lineage() {
            node.key()
        } else {
            match self.fallback {
                LineageFallback::Reject => {
                    self.diagnostics
                        .push(Diagnostic::missing_lineage(&node, &row_location(row_index)));
                    self.ledger
                        .discard(node.node_ref(), DiscardReason::InvalidLineage);
                    return AcceptOutcome::Rejected;
                }
                LineageFallback::IdOnly => {
                    warn!(
                        node_id = %node.id,
                        node_level = %node.level,
                        row = row_index,
                        "Node has no lineage; falling back to id-only duplicate check"
                    );
                    let key = node.key().id_only();
                    if self.id_only_keys.contains(&key) {
                        self.record_duplicate(node, row_index);
                        return AcceptOutcome::Duplicate;
                    }
                    self.id_only_keys.insert(key);
                    self.nodes.push(node);
                    return AcceptOutcome::Accepted;
                }
            }
        };

        if self.keys.contains(&key) {
            self.record_duplicate(node, row_index);
            return AcceptOutcome::Duplicate;
        }

        self.id_only_keys.insert(key.id_only());
        self.keys.insert(key);
        self.nodes.push(node);
        AcceptOutcome::Accepted
    }

    /// Record a row that failed extraction.
    pub fn record_row_error(&mut self, row_index: usize, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::row_error(row_index, message));
    }

    pub fn push_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn duplicates(&self) -> &[DuplicateRecord] {
        &self.duplicates
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn finish(self) -> AccumulatedNodes {
        AccumulatedNodes {
            nodes: self.nodes,
            duplicates: self.duplicates,
            diagnostics: self.diagnostics,
            ledger: self.ledger,
        }
    }

    fn record_duplicate(&mut self, node: Node, row_index: usize) {
        crate::log_hierarchy!(debug, operations::NODE_DUPLICATE,
            node_id: node.id,
            level: node.level,
            row: row_index
        );

        self.diagnostics.push(Diagnostic::duplicate(&node, row_index));
        self.ledger.discard(node.node_ref(), DiscardReason::Duplicates);
        self.duplicates.push(DuplicateRecord {
            id: node.id,
            level: node.level,
            lineage: node.lineage,
            row_index,
        });
    }
}
