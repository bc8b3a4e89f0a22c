//! Nodes extracted from rows, and their identity key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lineage::Lineage;
use crate::schema::Level;

/// One hierarchy node as extracted from a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: Option<String>,
    pub level: Level,
    #[serde(rename = "type")]
    pub node_type: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Raw predecessor/condition cells keyed by column.
    #[serde(default)]
    pub relationship: Map<String, Value>,
    /// Predecessor ids resolved from the relationship cells.
    #[serde(default)]
    pub relationships: Vec<String>,
    #[serde(default)]
    pub lineage: Option<Lineage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_type: Option<Value>,
    /// Row number where the node was first seen.
    #[serde(default)]
    pub source_row: usize,
}

impl Node {
    /// Identity key used for every equality and dedup decision.
    pub fn key(&self) -> NodeKey {
        NodeKey {
            id: self.id.clone(),
            level: self.level,
            lineage: self.lineage.clone(),
        }
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id.clone(),
            level: self.level,
            lineage: self.lineage.as_ref().map(Lineage::to_display_string),
            row_index: self.source_row,
        }
    }

    pub fn has_lineage(&self) -> bool {
        self.lineage.as_ref().is_some_and(|lineage| !lineage.is_empty())
    }
}

/// Structural identity of a node: same id, same level, same lineage.
///
/// `id` alone is not unique: the same id can appear under different
/// ancestries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    pub id: String,
    pub level: Level,
    pub lineage: Option<Lineage>,
}

impl NodeKey {
    /// Key with lineage stripped, for the id-only fallback comparison.
    pub fn id_only(&self) -> NodeKey {
        NodeKey {
            id: self.id.clone(),
            level: self.level,
            lineage: None,
        }
    }
}

/// Compact reference to a node, used in the disposition ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    pub id: String,
    pub level: Level,
    pub lineage: Option<String>,
    pub row_index: usize,
}
