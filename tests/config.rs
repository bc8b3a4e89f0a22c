//! Configuration Module Tests
//!
//! Tests for layered ImportConfig loading and level schema files.

mod common;

use std::io::Write;

use common::{fixture_path, level};
use flowmap_core::{ConfigLoader, ConfigurationError, ImportConfig, LevelSchema, LineageFallback};

fn repo_file(relative: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn config_has_expected_defaults() {
    let config = ImportConfig::default();

    assert_eq!(config.environment, "development");
    assert_eq!(config.csv_delimiter, ',');
    assert_eq!(config.predecessor_delimiters, vec![',', ';']);
    assert_eq!(config.lineage_fallback, LineageFallback::Reject);
    assert!(!config.validate_id_formats);
    assert!(config.max_rows.is_none());
    assert!(config.strict_headers);
}

#[test]
fn shipped_config_file_matches_defaults() {
    let config = ConfigLoader::new()
        .with_required_file(repo_file("config/flowmap.yaml"))
        .without_environment()
        .load()
        .expect("shipped config loads");

    assert_eq!(config, ImportConfig::default());
}

#[test]
fn environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "max_rows: 100\nenvironment: test").unwrap();

    std::env::set_var("FLOWMAP__MAX_ROWS", "500");
    std::env::set_var("FLOWMAP__LINEAGE_FALLBACK", "id_only");
    let loaded = ConfigLoader::new().with_file(file.path()).load();
    std::env::remove_var("FLOWMAP__MAX_ROWS");
    std::env::remove_var("FLOWMAP__LINEAGE_FALLBACK");

    let config = loaded.expect("config with env overrides loads");
    assert_eq!(config.max_rows, Some(500));
    assert_eq!(config.lineage_fallback, LineageFallback::IdOnly);
    assert_eq!(config.environment, "test");
}

#[test]
fn malformed_yaml_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "max_rows: [unterminated").unwrap();

    let result = ConfigLoader::new()
        .with_required_file(file.path())
        .without_environment()
        .load();
    assert!(result.is_err());
}

#[test]
fn fixture_schema_loads_from_file() {
    let schema = LevelSchema::from_file(&fixture_path("schema.yaml")).unwrap();

    assert_eq!(schema.len(), 5);
    let process = schema.get(level(4)).unwrap();
    assert_eq!(process.type_name(), "process");
    assert_eq!(process.step_type_column.as_deref(), Some("L4 Step Type"));
    assert_eq!(process.id_format.as_deref(), Some("AN"));

    let columns = schema.declared_columns();
    assert_eq!(columns.first().map(String::as_str), Some("L0_ID"));
    assert!(columns.contains(&"L4_Condition".to_string()));
}

#[test]
fn shipped_schema_matches_fixture() {
    let shipped = LevelSchema::from_file(&repo_file("config/schema.yaml")).unwrap();
    assert_eq!(shipped, LevelSchema::from_file(&fixture_path("schema.yaml")).unwrap());
}

#[test]
fn schema_file_errors() {
    let missing = LevelSchema::from_file(&fixture_path("no_such_schema.yaml"));
    assert!(matches!(missing, Err(ConfigurationError::FileReadError { .. })));

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "levels:\n  - level: L0\n    id_column: A\n    name_column: B\n  - level: L0\n    id_column: C\n    name_column: D"
    )
    .unwrap();
    let duplicate = LevelSchema::from_file(file.path());
    assert!(matches!(duplicate, Err(ConfigurationError::InvalidValue { .. })));

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "levels:\n  - level: L11\n    id_column: A\n    name_column: B").unwrap();
    assert!(matches!(
        LevelSchema::from_file(file.path()),
        Err(ConfigurationError::InvalidYaml { .. })
    ));
}
