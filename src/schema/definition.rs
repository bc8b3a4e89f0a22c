//! Level schema: which columns describe each hierarchy level.
//!
//! Schemas are supplied by the caller, usually as YAML:
//!
//! ```yaml
//! levels:
//!   - level: L0
//!     type: domain
//!     id_column: L0_ID
//!     name_column: L0_Name
//!   - level: L5
//!     type: step
//!     id_column: L5_ID
//!     name_column: L5_Name
//!     metadata_columns: ["L5_Owner", "L5 Step Type"]
//!     relationship:
//!       predecessor_column: L5_Predecessor
//!       condition_column: L5_Condition
//!     id_format: "STP-NNN"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

use super::level::Level;
use crate::config::{ConfigResult, ConfigurationError};
use crate::constants::{operations, STEP_TYPE_HINT};

/// Columns that encode a predecessor relationship for a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipColumns {
    #[serde(default)]
    pub predecessor_column: Option<String>,
    #[serde(default)]
    pub condition_column: Option<String>,
}

impl RelationshipColumns {
    fn columns(&self) -> impl Iterator<Item = &String> {
        self.predecessor_column
            .iter()
            .chain(self.condition_column.iter())
    }
}

/// Column layout of one hierarchy level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub level: Level,

    /// Static node type for every node at this level. Defaults by depth.
    #[serde(rename = "type", default)]
    pub node_type: Option<String>,

    pub id_column: String,

    pub name_column: String,

    /// Copied verbatim into each node's metadata, in this order.
    #[serde(default)]
    pub metadata_columns: Vec<String>,

    #[serde(default)]
    pub relationship: Option<RelationshipColumns>,

    /// Dash-delimited template, checked only when id format validation is on.
    #[serde(default)]
    pub id_format: Option<String>,

    /// Column holding the step type. When absent, resolved once at schema
    /// load from the metadata columns.
    #[serde(default)]
    pub step_type_column: Option<String>,
}

impl LevelDefinition {
    pub fn new(level: Level, id_column: impl Into<String>, name_column: impl Into<String>) -> Self {
        Self {
            level,
            node_type: None,
            id_column: id_column.into(),
            name_column: name_column.into(),
            metadata_columns: Vec::new(),
            relationship: None,
            id_format: None,
            step_type_column: None,
        }
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_metadata_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_relationship(
        mut self,
        predecessor_column: Option<&str>,
        condition_column: Option<&str>,
    ) -> Self {
        self.relationship = Some(RelationshipColumns {
            predecessor_column: predecessor_column.map(str::to_string),
            condition_column: condition_column.map(str::to_string),
        });
        self
    }

    pub fn with_id_format(mut self, template: impl Into<String>) -> Self {
        self.id_format = Some(template.into());
        self
    }

    pub fn with_step_type_column(mut self, column: impl Into<String>) -> Self {
        self.step_type_column = Some(column.into());
        self
    }

    /// The node type carried by nodes at this level.
    pub fn type_name(&self) -> String {
        self.node_type
            .clone()
            .unwrap_or_else(|| default_type_for(self.level).to_string())
    }

    /// Every column this level reads, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.id_column)
            .chain(std::iter::once(&self.name_column))
            .chain(self.metadata_columns.iter())
            .chain(self.relationship.iter().flat_map(RelationshipColumns::columns))
            .chain(self.step_type_column.iter())
    }

    fn resolve_step_type_column(&mut self) {
        if self.step_type_column.is_some() {
            return;
        }
        self.step_type_column = self
            .metadata_columns
            .iter()
            .find(|column| column.to_lowercase().contains(STEP_TYPE_HINT))
            .cloned();
    }
}

fn default_type_for(level: Level) -> &'static str {
    match level.index() {
        0 => "domain",
        1 => "line_of_business",
        2 => "journey",
        3 => "process_area",
        4 => "process",
        5 => "step",
        _ => "sub_step",
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    levels: Vec<LevelDefinition>,
}

/// Validated set of level definitions, keyed by level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSchema {
    levels: BTreeMap<Level, LevelDefinition>,
}

impl LevelSchema {
    /// Build a schema, validating it and resolving step type columns.
    pub fn new(definitions: Vec<LevelDefinition>) -> ConfigResult<Self> {
        if definitions.is_empty() {
            return Err(ConfigurationError::schema_validation(
                "schema defines no levels",
            ));
        }

        let mut levels = BTreeMap::new();
        for mut definition in definitions {
            if definition.id_column.trim().is_empty() {
                return Err(ConfigurationError::missing_required_field(
                    "id_column",
                    format!("level {}", definition.level),
                ));
            }
            if definition.name_column.trim().is_empty() {
                return Err(ConfigurationError::missing_required_field(
                    "name_column",
                    format!("level {}", definition.level),
                ));
            }
            definition.resolve_step_type_column();

            let level = definition.level;
            if levels.insert(level, definition).is_some() {
                return Err(ConfigurationError::invalid_value(
                    "level",
                    level.to_string(),
                    "level defined more than once",
                ));
            }
        }

        Ok(Self { levels })
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Self::parse_yaml("<inline>", yaml)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))?;
        Self::parse_yaml(&path.display().to_string(), &content)
    }

    fn parse_yaml(origin: &str, yaml: &str) -> ConfigResult<Self> {
        let document: SchemaDocument =
            serde_yaml::from_str(yaml).map_err(|e| ConfigurationError::invalid_yaml(origin, e))?;
        let schema = Self::new(document.levels)?;

        debug!(
            operation = operations::SCHEMA_LOADED,
            origin = %origin,
            levels = schema.len(),
            "Level schema loaded"
        );
        Ok(schema)
    }

    pub fn get(&self, level: Level) -> Option<&LevelDefinition> {
        self.levels.get(&level)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.values()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Ordered, de-duplicated list of every column the schema reads.
    ///
    /// Used as the header list when importing keyed records.
    pub fn declared_columns(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.definitions()
            .flat_map(LevelDefinition::columns)
            .filter(|column| seen.insert(column.as_str()))
            .cloned()
            .collect()
    }
}
