//! Node Extractor
//!
//! Walks levels `L0`..`L10` of one denormalized row and builds a node for every
//! level whose id cell is populated.

use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::trace;

use super::resolver::{PredecessorResolver, RowContext};
use crate::error::{ImportError, ImportResult};
use crate::ingest::NormalizedTable;
use crate::models::{Lineage, Node};
use crate::schema::{Level, LevelDefinition, LevelSchema};
use crate::validation::validate_row_cells;

/// Trimmed text of a scalar cell, `None` when null or blank.
pub fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub struct NodeExtractor<'a> {
    schema: &'a LevelSchema,
    resolver: &'a dyn PredecessorResolver,
    read_columns: Vec<String>,
}

impl<'a> NodeExtractor<'a> {
    pub fn new(schema: &'a LevelSchema, resolver: &'a dyn PredecessorResolver) -> Self {
        Self {
            schema,
            resolver,
            read_columns: schema.declared_columns(),
        }
    }

    /// Extract the nodes of data row `index`.
    ///
    /// Nodes repeated within the row are dropped silently; cross-row
    /// duplicates are the accumulator's concern.
    pub fn extract(&self, table: &NormalizedTable, index: usize) -> ImportResult<Vec<Node>> {
        let row_number = table.row_number(index);
        let row = table.rows.get(index).ok_or_else(|| {
            ImportError::row_processing(row_number, format!("row index {index} out of range"))
        })?;

        let reader = RowReader { table, row };
        let read_cells = self
            .read_columns
            .iter()
            .filter_map(|column| reader.cell(column).map(|cell| (column.as_str(), cell)));
        validate_row_cells(read_cells)
            .map_err(|message| ImportError::row_processing(row_number, message))?;

        let context = RowContext {
            row,
            headers: &table.headers,
            row_number,
        };

        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        for level in Level::all() {
            let Some(definition) = self.schema.get(level) else {
                continue;
            };
            let Some(id_cell) = reader.cell(&definition.id_column) else {
                continue;
            };
            let Some(id) = cell_text(id_cell) else {
                trace!(
                    row = row_number,
                    node_level = %level,
                    column = %definition.id_column,
                    "No id for level in row; skipping"
                );
                continue;
            };

            let node = self
                .build_node(id, definition, &reader, &context)
                .map_err(|e| ImportError::row_processing(row_number, format!("{e:#}")))?;

            if seen.insert(node.key()) {
                nodes.push(node);
            }
        }

        Ok(nodes)
    }

    fn build_node(
        &self,
        id: String,
        definition: &LevelDefinition,
        reader: &RowReader<'_>,
        context: &RowContext<'_>,
    ) -> anyhow::Result<Node> {
        let level = definition.level;

        let name = reader.cell(&definition.name_column).and_then(cell_text);

        let parent_id = level
            .parent()
            .and_then(|parent| self.schema.get(parent))
            .and_then(|parent| reader.text(&parent.id_column));

        let metadata: Map<String, Value> = definition
            .metadata_columns
            .iter()
            .map(|column| {
                let value = reader.cell(column).cloned().unwrap_or(Value::Null);
                (column.clone(), value)
            })
            .collect();

        let mut relationship = Map::new();
        let mut relationships = Vec::new();
        if let Some(columns) = &definition.relationship {
            if let Some(column) = &columns.predecessor_column {
                if let Some(raw) = reader.cell(column).filter(|v| !is_blank(v)) {
                    relationships = self.resolver.resolve(raw, context).map_err(|e| {
                        e.context(format!("resolving predecessors in column '{column}'"))
                    })?;
                    relationship.insert(column.clone(), raw.clone());
                }
            }
            if let Some(column) = &columns.condition_column {
                if let Some(raw) = reader.cell(column).filter(|v| !is_blank(v)) {
                    relationship.insert(column.clone(), raw.clone());
                }
            }
        }

        let lineage: Lineage = level
            .up_to()
            .filter_map(|ancestor| {
                let definition = self.schema.get(ancestor)?;
                Some((ancestor, reader.text(&definition.id_column)?))
            })
            .collect();

        let step_type = definition
            .step_type_column
            .as_deref()
            .and_then(|column| reader.cell(column))
            .filter(|v| !is_blank(v))
            .cloned();

        Ok(Node {
            id,
            name,
            level,
            node_type: definition.type_name(),
            parent_id,
            metadata,
            relationship,
            relationships,
            lineage: Some(lineage),
            step_type,
            source_row: context.row_number,
        })
    }
}

struct RowReader<'a> {
    table: &'a NormalizedTable,
    row: &'a [Value],
}

impl<'a> RowReader<'a> {
    fn cell(&self, column: &str) -> Option<&'a Value> {
        self.table
            .column_index(column)
            .and_then(|index| self.row.get(index))
    }

    fn text(&self, column: &str) -> Option<String> {
        self.cell(column).and_then(cell_text)
    }
}
