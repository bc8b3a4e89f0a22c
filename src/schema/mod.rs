//! # Level Schema
//!
//! Caller-supplied description of the hierarchy's columns: per level, where the
//! id and name live, which columns are metadata, and which columns encode a
//! predecessor relationship.

pub mod definition;
pub mod level;

pub use definition::{LevelDefinition, LevelSchema, RelationshipColumns};
pub use level::{Level, ParseLevelError};
