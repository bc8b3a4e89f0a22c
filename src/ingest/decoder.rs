//! Decoding spreadsheet-like bytes into a grid of cells.

use serde_json::Value;

use crate::error::ImportResult;

/// Turns the raw bytes of a tabular file into rows of cells.
///
/// Row 0 of the returned grid is the header row.
pub trait GridDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<Value>>>;
}

/// Delimited-text decoder backed by the `csv` crate.
#[derive(Debug, Clone)]
pub struct CsvGridDecoder {
    delimiter: u8,
}

impl CsvGridDecoder {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvGridDecoder {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl GridDecoder for CsvGridDecoder {
    fn decode(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<Value>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(bytes);

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            grid.push(
                record
                    .iter()
                    .map(|field| Value::String(field.to_string()))
                    .collect(),
            );
        }
        Ok(grid)
    }
}
