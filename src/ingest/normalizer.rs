//! Row Normalizer
//!
//! Converts either source shape (a decoded grid whose first row is the header
//! row, or keyed records plus a header list) into one [`NormalizedTable`] where
//! every row has exactly one cell per header.

use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use super::decoder::GridDecoder;
use crate::constants::{messages, operations, GRID_FIRST_DATA_ROW, RECORDS_FIRST_DATA_ROW};
use crate::error::{ImportError, ImportResult};
use crate::schema::LevelSchema;
use crate::validation::validate_headers;

/// Raw input to an import.
#[derive(Debug, Clone)]
pub enum SourceData {
    /// Spreadsheet-like file contents, decoded by a [`GridDecoder`].
    Bytes(Vec<u8>),
    /// Already-decoded grid; row 0 holds the headers.
    Grid(Vec<Vec<Value>>),
    /// Keyed records (DB mode). Headers default to the schema's declared
    /// columns.
    Records {
        records: Vec<Map<String, Value>>,
        headers: Option<Vec<String>>,
    },
}

/// Uniform `(headers, rows)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    first_row_number: usize,
    column_positions: HashMap<String, usize>,
}

impl NormalizedTable {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>, first_row_number: usize) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();

        let mut column_positions = HashMap::with_capacity(width);
        for (index, header) in headers.iter().enumerate() {
            // Blank headers leave their column unaddressable
            if !header.trim().is_empty() {
                column_positions.entry(header.clone()).or_insert(index);
            }
        }

        Self {
            headers,
            rows,
            first_row_number,
            column_positions,
        }
    }

    /// Position of a column, first occurrence wins.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.column_positions.get(column).copied()
    }

    /// User-facing row number of the data row at `index`.
    pub fn row_number(&self, index: usize) -> usize {
        self.first_row_number + index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Normalizes [`SourceData`] into a [`NormalizedTable`].
pub struct RowNormalizer<'a> {
    decoder: &'a dyn GridDecoder,
    strict_headers: bool,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(decoder: &'a dyn GridDecoder, strict_headers: bool) -> Self {
        Self {
            decoder,
            strict_headers,
        }
    }

    pub fn normalize(&self, source: SourceData, schema: &LevelSchema) -> ImportResult<NormalizedTable> {
        let read_columns = schema.declared_columns();
        let table = match source {
            SourceData::Bytes(bytes) => {
                self.normalize_grid(self.decoder.decode(&bytes)?, &read_columns)?
            }
            SourceData::Grid(grid) => self.normalize_grid(grid, &read_columns)?,
            SourceData::Records { records, headers } => {
                let headers = headers.unwrap_or_else(|| read_columns.clone());
                self.normalize_records(records, headers, &read_columns)?
            }
        };

        debug!(
            operation = operations::SOURCE_NORMALIZED,
            columns = table.headers.len(),
            rows = table.len(),
            "Source normalized"
        );
        Ok(table)
    }

    fn normalize_grid(
        &self,
        grid: Vec<Vec<Value>>,
        read_columns: &[String],
    ) -> ImportResult<NormalizedTable> {
        let mut rows = grid.into_iter();
        let headers: Vec<String> = rows
            .next()
            .map(|header_row| header_row.iter().map(header_text).collect())
            .unwrap_or_default();

        self.check_headers(&headers, read_columns)?;

        let data: Vec<Vec<Value>> = rows.collect();
        if data.is_empty() {
            return Err(ImportError::invalid_input(messages::NO_DATA_ROWS));
        }

        Ok(NormalizedTable::new(headers, data, GRID_FIRST_DATA_ROW))
    }

    fn normalize_records(
        &self,
        records: Vec<Map<String, Value>>,
        headers: Vec<String>,
        read_columns: &[String],
    ) -> ImportResult<NormalizedTable> {
        self.check_headers(&headers, read_columns)?;

        if records.is_empty() {
            return Err(ImportError::invalid_input(messages::NO_DATA_ROWS));
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                headers
                    .iter()
                    .map(|header| record.remove(header).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(NormalizedTable::new(headers, rows, RECORDS_FIRST_DATA_ROW))
    }

    fn check_headers(&self, headers: &[String], read_columns: &[String]) -> ImportResult<()> {
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ImportError::invalid_input(messages::NO_HEADERS));
        }
        if self.strict_headers {
            validate_headers(headers, read_columns)?;
        }
        Ok(())
    }
}

fn header_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::CsvGridDecoder;
    use crate::schema::{Level, LevelDefinition};
    use serde_json::json;

    fn schema() -> LevelSchema {
        LevelSchema::new(vec![
            LevelDefinition::new(Level::ROOT, "L0_ID", "L0_Name"),
            LevelDefinition::new(Level::new(1).unwrap(), "L1_ID", "L1_Name"),
        ])
        .unwrap()
    }

    fn normalize(source: SourceData) -> ImportResult<NormalizedTable> {
        let decoder = CsvGridDecoder::default();
        RowNormalizer::new(&decoder, true).normalize(source, &schema())
    }

    #[test]
    fn test_grid_rows_are_padded_to_header_width() {
        let table = normalize(SourceData::Grid(vec![
            vec![json!("L0_ID"), json!("L0_Name"), json!("L1_ID")],
            vec![json!("D1")],
            vec![json!("D2"), json!("Two"), json!("B2"), json!("extra")],
        ]))
        .unwrap();

        assert_eq!(table.headers, vec!["L0_ID", "L0_Name", "L1_ID"]);
        assert_eq!(table.rows[0], vec![json!("D1"), Value::Null, Value::Null]);
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.row_number(0), 2);
        assert_eq!(table.column_index("L1_ID"), Some(2));
    }

    #[test]
    fn test_bytes_are_decoded() {
        let table = normalize(SourceData::Bytes(b"L0_ID,L0_Name\nD1,Domain\n".to_vec())).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][1], json!("Domain"));
    }

    #[test]
    fn test_no_data_rows() {
        let err = normalize(SourceData::Bytes(b"L0_ID,L0_Name\n".to_vec())).unwrap_err();
        assert!(matches!(err, ImportError::InvalidInput(ref m) if m == messages::NO_DATA_ROWS));
    }

    #[test]
    fn test_no_headers() {
        let err = normalize(SourceData::Grid(vec![])).unwrap_err();
        assert!(matches!(err, ImportError::InvalidInput(ref m) if m == messages::NO_HEADERS));

        let err = normalize(SourceData::Grid(vec![vec![Value::Null, json!("")]])).unwrap_err();
        assert!(matches!(err, ImportError::InvalidInput(ref m) if m == messages::NO_HEADERS));
    }

    #[test]
    fn test_records_use_schema_columns() {
        let mut record = Map::new();
        record.insert("L1_ID".to_string(), json!("B1"));
        record.insert("L0_ID".to_string(), json!("D1"));
        record.insert("Unrelated".to_string(), json!("ignored"));

        let table = normalize(SourceData::Records {
            records: vec![record],
            headers: None,
        })
        .unwrap();

        assert_eq!(table.headers, vec!["L0_ID", "L0_Name", "L1_ID", "L1_Name"]);
        assert_eq!(
            table.rows[0],
            vec![json!("D1"), Value::Null, json!("B1"), Value::Null]
        );
        assert_eq!(table.row_number(0), 1);
    }

    #[test]
    fn test_records_without_rows() {
        let err = normalize(SourceData::Records {
            records: vec![],
            headers: Some(vec!["L0_ID".to_string()]),
        })
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidInput(_)));
    }

    #[test]
    fn test_blank_headers_are_unaddressable() {
        let table = normalize(SourceData::Bytes(b"L0_ID,L1_ID,\nD1,B1,\n".to_vec())).unwrap();
        assert_eq!(table.headers, vec!["L0_ID", "L1_ID", ""]);
        assert_eq!(table.column_index(""), None);
        assert_eq!(table.column_index("L1_ID"), Some(1));
    }

    #[test]
    fn test_duplicate_unread_headers_are_allowed() {
        let table = normalize(SourceData::Grid(vec![
            vec![json!("L0_ID"), json!("Notes"), json!("Notes")],
            vec![json!("D1"), json!("a"), json!("b")],
        ]))
        .unwrap();
        assert_eq!(table.column_index("Notes"), Some(1));
    }

    #[test]
    fn test_strict_headers_reject_duplicates() {
        let err = normalize(SourceData::Grid(vec![
            vec![json!("L0_ID"), json!("L0_ID")],
            vec![json!("D1"), json!("D1")],
        ]))
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidInput(_)));
    }
}
