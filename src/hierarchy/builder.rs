//! Hierarchy Builder
//!
//! Places the deduplicated node list into a tree keyed by lineage. Nodes are
//! processed shallowest level first so a parent is always in the tree before
//! its children are looked up. Malformed nodes are discarded and recorded,
//! never raised.

use tracing::debug;

use super::disposition::{DiscardReason, DispositionLedger};
use crate::constants::{operations, HIERARCHY_LOCATION};
use crate::models::{Diagnostic, Hierarchy, HierarchyNode, Node};

/// Result of one tree build.
#[derive(Debug, Clone)]
pub struct HierarchyBuild {
    pub hierarchy: Hierarchy,
    /// Nodes whose parent could not be found by lineage.
    pub orphans: Vec<Node>,
    pub validation_errors: Vec<Diagnostic>,
    pub ledger: DispositionLedger,
}

#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    ledger: DispositionLedger,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue an existing ledger, typically the one the accumulator filled.
    pub fn with_ledger(ledger: DispositionLedger) -> Self {
        Self { ledger }
    }

    pub fn build(self, nodes: &[Node]) -> HierarchyBuild {
        let mut ledger = self.ledger;
        let mut hierarchy = Hierarchy::new();
        let mut orphans = Vec::new();
        let mut validation_errors = Vec::new();

        // Stable, so rows keep their order within a level.
        let mut sorted: Vec<&Node> = nodes.iter().collect();
        sorted.sort_by_key(|node| node.level);

        for node in sorted {
            let Some(parent_level) = node.level.parent() else {
                match hierarchy.insert_root(HierarchyNode::new(node.clone())) {
                    Ok(()) => ledger.include(node.node_ref()),
                    Err(_) => {
                        discard(&mut ledger, node, DiscardReason::Duplicates);
                        validation_errors.push(Diagnostic::slot_taken(node));
                    }
                }
                continue;
            };

            let lineage = match &node.lineage {
                Some(lineage) if !lineage.is_empty() => lineage,
                _ => {
                    discard(&mut ledger, node, DiscardReason::InvalidLineage);
                    validation_errors.push(Diagnostic::missing_lineage(node, HIERARCHY_LOCATION));
                    continue;
                }
            };

            let Some(parent) = hierarchy.find_by_lineage_mut(lineage, parent_level) else {
                discard(&mut ledger, node, DiscardReason::MissingParent);
                validation_errors.push(Diagnostic::missing_parent(node));
                orphans.push(node.clone());
                continue;
            };

            if parent.children.contains_key(&node.id) {
                discard(&mut ledger, node, DiscardReason::Duplicates);
                validation_errors.push(Diagnostic::slot_taken(node));
                continue;
            }

            parent
                .children
                .insert(node.id.clone(), HierarchyNode::new(node.clone()));
            ledger.include(node.node_ref());
        }

        hierarchy.snapshot_processes();

        crate::log_import!(debug, operations::HIERARCHY_BUILT,
            roots: hierarchy.roots().len(),
            included: ledger.included_count(),
            discarded: ledger.discarded_count(),
            orphans: orphans.len()
        );

        HierarchyBuild {
            hierarchy,
            orphans,
            validation_errors,
            ledger,
        }
    }
}

fn discard(ledger: &mut DispositionLedger, node: &Node, reason: DiscardReason) {
    debug!(
        operation = operations::NODE_DISCARDED,
        node_id = %node.id,
        node_level = %node.level,
        reason = ?reason,
        row = node.source_row,
        "Node discarded from hierarchy"
    );
    ledger.discard(node.node_ref(), reason);
}

/// Build a tree from `nodes` with a fresh ledger.
pub fn build_hierarchy(nodes: &[Node]) -> HierarchyBuild {
    HierarchyBuilder::new().build(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiagnosticCode, Severity};
    use crate::schema::Level;
    use serde_json::Map;

    fn node(id: &str, ancestry: &[&str]) -> Node {
        let level = Level::new(ancestry.len() as u8).unwrap();
        let mut lineage: crate::models::Lineage = ancestry
            .iter()
            .enumerate()
            .map(|(i, id)| (Level::new(i as u8).unwrap(), id.to_string()))
            .collect();
        lineage.insert(level, id.to_string());
        Node {
            id: id.to_string(),
            name: Some(format!("{id} name")),
            level,
            node_type: "test".to_string(),
            parent_id: ancestry.last().map(|id| id.to_string()),
            metadata: Map::new(),
            relationship: Map::new(),
            relationships: Vec::new(),
            lineage: Some(lineage),
            step_type: None,
            source_row: 2,
        }
    }

    #[test]
    fn test_children_before_parents_in_input_still_attach() {
        let nodes = vec![
            node("P1", &["D1", "B1", "J1", "A1"]),
            node("A1", &["D1", "B1", "J1"]),
            node("J1", &["D1", "B1"]),
            node("B1", &["D1"]),
            node("D1", &[]),
        ];

        let build = build_hierarchy(&nodes);
        assert!(build.orphans.is_empty());
        assert!(build.validation_errors.is_empty());
        assert_eq!(build.ledger.included_count(), 5);
        assert_eq!(build.hierarchy.node_count(), 5);

        let area = &build.hierarchy.root("D1").unwrap().children["B1"].children["J1"].children["A1"];
        let processes = area.processes.as_ref().unwrap();
        assert!(processes.contains_key("P1"));
    }

    #[test]
    fn test_missing_parent_becomes_orphan() {
        let mut orphan = node("J1", &["D1", "B1"]);
        orphan.lineage.as_mut().unwrap().insert(Level::new(1).unwrap(), "B9".to_string());
        let nodes = vec![node("D1", &[]), node("B1", &["D1"]), orphan];

        let build = build_hierarchy(&nodes);
        assert_eq!(build.orphans.len(), 1);
        assert_eq!(build.orphans[0].id, "J1");
        assert_eq!(build.ledger.discarded(DiscardReason::MissingParent).len(), 1);

        let error = &build.validation_errors[0];
        assert_eq!(error.severity, Severity::Error);
        assert_eq!(error.code, DiagnosticCode::MissingParent);
        assert_eq!(error.level, Some(Level::new(2).unwrap()));
        assert!(error.lineage.is_some());
    }

    #[test]
    fn test_missing_lineage_is_invalid() {
        let mut lost = node("B1", &["D1"]);
        lost.lineage = None;
        let build = build_hierarchy(&[node("D1", &[]), lost]);

        assert!(build.orphans.is_empty());
        assert_eq!(build.ledger.discarded(DiscardReason::InvalidLineage).len(), 1);
        assert_eq!(build.validation_errors[0].message, "Missing lineage information");
        assert_eq!(build.validation_errors[0].location, "Hierarchy");
    }

    #[test]
    fn test_taken_slot_is_not_overwritten() {
        let mut second = node("B1", &["D1"]);
        second.name = Some("Replacement".to_string());
        let build = build_hierarchy(&[node("D1", &[]), node("D1", &[]), node("B1", &["D1"]), second]);

        assert_eq!(build.ledger.discarded(DiscardReason::Duplicates).len(), 2);
        let lob = &build.hierarchy.root("D1").unwrap().children["B1"];
        assert_eq!(lob.node.name.as_deref(), Some("B1 name"));
    }

    #[test]
    fn test_continues_existing_ledger() {
        let mut ledger = DispositionLedger::new();
        ledger.discard(node("X", &[]).node_ref(), DiscardReason::Duplicates);

        let build = HierarchyBuilder::with_ledger(ledger).build(&[node("D1", &[])]);
        let summary = build.ledger.summary();
        assert_eq!(summary.total_nodes, 2);
        assert_eq!(summary.included_nodes, 1);
        assert_eq!(summary.discarded_nodes.total, 1);
    }
}
