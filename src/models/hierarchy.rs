//! The nested hierarchy tree handed to the UI layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::lineage::Lineage;
use super::node::Node;
use crate::constants::PROCESS_SNAPSHOT_LEVEL;
use crate::schema::Level;

pub type Children = BTreeMap<String, HierarchyNode>;

/// A node placed in the tree, with its children keyed by id.
///
/// Nodes at `L3` also carry `processes`, a snapshot of `children` taken when
/// the tree was built. The snapshot shares nothing with `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub node: Node,
    #[serde(default)]
    pub children: Children,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processes: Option<Children>,
}

impl HierarchyNode {
    pub fn new(node: Node) -> Self {
        let processes = is_snapshot_level(node.level).then(Children::new);
        Self {
            node,
            children: Children::new(),
            processes,
        }
    }

    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn level(&self) -> Level {
        self.node.level
    }

    /// Copy this node and everything beneath it.
    ///
    /// Value fields are copied, every child map is rebuilt, and the copy shares
    /// no mutable state with `self`.
    pub fn clone_subtree(&self) -> HierarchyNode {
        HierarchyNode {
            node: self.node.clone(),
            children: clone_children(&self.children),
            processes: self.processes.as_ref().map(clone_children),
        }
    }

    /// Post-order pass that refreshes the `processes` snapshot of every
    /// `L3` node in this subtree.
    pub fn snapshot_processes(&mut self) {
        for child in self.children.values_mut() {
            child.snapshot_processes();
        }
        if is_snapshot_level(self.level()) {
            self.processes = Some(clone_children(&self.children));
        }
    }

    /// Number of nodes in this subtree, `self` included. Snapshots are not
    /// counted.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .values()
            .map(HierarchyNode::subtree_size)
            .sum::<usize>()
    }
}

fn is_snapshot_level(level: Level) -> bool {
    level.index() == PROCESS_SNAPSHOT_LEVEL
}

fn clone_children(children: &Children) -> Children {
    children
        .iter()
        .map(|(id, child)| (id.clone(), child.clone_subtree()))
        .collect()
}

/// Roots of the tree keyed by `L0` id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hierarchy {
    roots: BTreeMap<String, HierarchyNode>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &BTreeMap<String, HierarchyNode> {
        &self.roots
    }

    pub fn root(&self, id: &str) -> Option<&HierarchyNode> {
        self.roots.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Insert a root. Hands the node back if the id is already taken.
    pub fn insert_root(&mut self, node: HierarchyNode) -> Result<(), HierarchyNode> {
        if self.roots.contains_key(node.id()) {
            return Err(node);
        }
        self.roots.insert(node.id().to_string(), node);
        Ok(())
    }

    /// Follow `lineage` from its `L0` root down to `depth`.
    ///
    /// Fails if any level on the way has no lineage entry or no matching child.
    pub fn find_by_lineage(&self, lineage: &Lineage, depth: Level) -> Option<&HierarchyNode> {
        let mut current = self.roots.get(lineage.get(Level::ROOT)?)?;
        for level in (1..=depth.index()).filter_map(Level::new) {
            current = current.children.get(lineage.get(level)?)?;
        }
        Some(current)
    }

    pub fn find_by_lineage_mut(
        &mut self,
        lineage: &Lineage,
        depth: Level,
    ) -> Option<&mut HierarchyNode> {
        let mut current = self.roots.get_mut(lineage.get(Level::ROOT)?)?;
        for level in (1..=depth.index()).filter_map(Level::new) {
            current = current.children.get_mut(lineage.get(level)?)?;
        }
        Some(current)
    }

    /// Depth-first, pre-order walk over every placed node (snapshots
    /// excluded). Order is deterministic: roots and children by id.
    pub fn walk(&self) -> Vec<&HierarchyNode> {
        let mut visited = Vec::new();
        let mut stack: Vec<&HierarchyNode> = self.roots.values().rev().collect();
        while let Some(node) = stack.pop() {
            visited.push(node);
            stack.extend(node.children.values().rev());
        }
        visited
    }

    pub fn node_count(&self) -> usize {
        self.roots.values().map(HierarchyNode::subtree_size).sum()
    }

    /// Refresh the `processes` snapshot of every `L3` node in the tree.
    pub fn snapshot_processes(&mut self) {
        for root in self.roots.values_mut() {
            root.snapshot_processes();
        }
    }
}
