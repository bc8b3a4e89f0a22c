//! # System Constants
//!
//! Core constants that define the operational boundaries of a hierarchy
//! import: level depth, row numbering, input limits and the fixed diagnostic
//! messages surfaced to the UI layer.

/// Highest level index a schema may define (`L10`).
pub const MAX_LEVEL_INDEX: u8 = 10;

/// Number of level slots walked for every row (`L0`..`L10`).
pub const LEVEL_SLOTS: usize = MAX_LEVEL_INDEX as usize + 1;

/// Level whose nodes receive a `processes` snapshot of their children.
pub const PROCESS_SNAPSHOT_LEVEL: u8 = 3;

/// Row number of the first data row when the source has a header row
/// (1-based numbering plus the header line).
pub const GRID_FIRST_DATA_ROW: usize = 2;

/// Row number of the first record in record (DB) mode.
pub const RECORDS_FIRST_DATA_ROW: usize = 1;

/// Maximum header name length accepted at normalisation time.
pub const MAX_HEADER_LENGTH: usize = 256;

/// Maximum length of a single cell's string value.
pub const MAX_CELL_LENGTH: usize = 32 * 1024;

/// Substring used to find a step type column among metadata columns when the
/// schema does not name one explicitly.
pub const STEP_TYPE_HINT: &str = "step type";

/// Separator between entries in a human-readable lineage string.
pub const LINEAGE_STRING_SEPARATOR: &str = " > ";

/// Location label for diagnostics raised while building the tree.
pub const HIERARCHY_LOCATION: &str = "Hierarchy";

/// Fixed diagnostic messages.
pub mod messages {
    pub const NO_HEADERS: &str = "No headers found in source";
    pub const NO_DATA_ROWS: &str = "No data rows found";
    pub const MISSING_LINEAGE: &str = "Missing lineage information";
    pub const MISSING_PARENT: &str = "Could not find parent in hierarchy using lineage path";
    pub const DUPLICATE_PREFIX: &str = "Duplicate node found";
    pub const SLOT_TAKEN: &str = "Node already present in hierarchy";
}

/// Operation names used in structured log events.
pub mod operations {
    pub const IMPORT_STARTED: &str = "import.started";
    pub const IMPORT_COMPLETED: &str = "import.completed";
    pub const IMPORT_FAILED: &str = "import.failed";
    pub const IMPORT_CANCELLED: &str = "import.cancelled";
    pub const SOURCE_NORMALIZED: &str = "source.normalized";
    pub const ROW_FAILED: &str = "row.failed";
    pub const NODE_DUPLICATE: &str = "node.duplicate";
    pub const HIERARCHY_BUILT: &str = "hierarchy.built";
    pub const NODE_DISCARDED: &str = "node.discarded";
    pub const SCHEMA_LOADED: &str = "schema.loaded";
    pub const CONFIG_LOADED: &str = "config.loaded";
}
