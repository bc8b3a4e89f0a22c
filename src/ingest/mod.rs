//! # Source Ingestion
//!
//! Everything between raw input and the uniform `(headers, rows)` table the
//! extractor walks: grid decoding, row normalisation and record sources.

pub mod decoder;
pub mod normalizer;
pub mod record_source;

pub use decoder::{CsvGridDecoder, GridDecoder};
pub use normalizer::{NormalizedTable, RowNormalizer, SourceData};
pub use record_source::{RecordSource, StaticRecordSource};
