//! Shared fixtures and builders for integration tests.

#![allow(dead_code)]

pub mod strategies;

use std::path::PathBuf;

use flowmap_core::schema::{Level, LevelDefinition, LevelSchema};
use flowmap_core::SourceData;
use serde_json::{json, Value};

pub fn level(index: u8) -> Level {
    Level::new(index).expect("level index in range")
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The schema used by `process_hierarchy.csv`.
pub fn fixture_schema() -> LevelSchema {
    LevelSchema::from_file(&fixture_path("schema.yaml")).expect("fixture schema loads")
}

/// `L0`..`L{depth-1}` with `Ln_ID` / `Ln_Name` columns.
pub fn id_schema(depth: u8) -> LevelSchema {
    LevelSchema::new(
        (0..depth)
            .map(|i| LevelDefinition::new(level(i), format!("L{i}_ID"), format!("L{i}_Name")))
            .collect(),
    )
    .expect("generated schema is valid")
}

pub fn id_headers(depth: u8) -> Vec<String> {
    (0..depth).map(|i| format!("L{i}_ID")).collect()
}

/// Grid source with `headers` as row 0.
pub fn grid<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) -> SourceData {
    let mut grid: Vec<Vec<Value>> = vec![headers.iter().map(|h| json!(h.as_ref())).collect()];
    grid.extend(
        rows.iter()
            .map(|row| row.iter().map(|cell| json!(cell.as_ref())).collect()),
    );
    SourceData::Grid(grid)
}
