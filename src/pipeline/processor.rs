//! # Import Processor
//!
//! Runs one import end to end: normalize the source, extract and deduplicate
//! nodes row by row, build the tree, and assemble the summary.
//!
//! Each call to [`ImportProcessor::process`] owns its accumulator, ledger and
//! tree, so one processor can serve concurrent imports.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flowmap_core::extraction::DelimitedPredecessorResolver;
//! use flowmap_core::ingest::SourceData;
//! use flowmap_core::pipeline::ImportProcessor;
//! use flowmap_core::schema::LevelSchema;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = LevelSchema::from_file("config/schema.yaml".as_ref())?;
//! let resolver = DelimitedPredecessorResolver::default();
//!
//! let outcome = ImportProcessor::new(&schema, &resolver)
//!     .process(SourceData::Bytes(std::fs::read("hierarchy.csv")?))?;
//!
//! for diagnostic in &outcome.validations {
//!     println!("{diagnostic}");
//! }
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::path::Path;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::cancellation::CancellationFlag;
use crate::config::ImportConfig;
use crate::constants::operations;
use crate::error::{ImportError, ImportResult};
use crate::extraction::{NodeAccumulator, NodeExtractor, PredecessorResolver};
use crate::hierarchy::HierarchyBuilder;
use crate::ingest::{CsvGridDecoder, GridDecoder, NormalizedTable, RecordSource, RowNormalizer, SourceData};
use crate::models::{Diagnostic, Hierarchy, Node};
use crate::reporting::ImportSummary;
use crate::schema::LevelSchema;
use crate::validation::validate_id_formats;

/// Everything an import produces.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub nodes: Vec<Node>,
    pub hierarchy: Hierarchy,
    pub validations: Vec<Diagnostic>,
    pub summary: ImportSummary,
}

pub struct ImportProcessor<'a> {
    schema: &'a LevelSchema,
    resolver: &'a dyn PredecessorResolver,
    config: ImportConfig,
    decoder: Option<&'a dyn GridDecoder>,
    cancellation: Option<CancellationFlag>,
}

impl<'a> ImportProcessor<'a> {
    pub fn new(schema: &'a LevelSchema, resolver: &'a dyn PredecessorResolver) -> Self {
        Self {
            schema,
            resolver,
            config: ImportConfig::default(),
            decoder: None,
            cancellation: None,
        }
    }

    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Decoder for [`SourceData::Bytes`]. Defaults to CSV using the
    /// configured delimiter.
    pub fn with_decoder(mut self, decoder: &'a dyn GridDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Run one import.
    ///
    /// Row-level and node-level problems end up in `validations`; only
    /// structural failures are returned as errors, and internal failures are
    /// reported as [`ImportError::Processing`].
    pub fn process(&self, source: SourceData) -> ImportResult<ImportOutcome> {
        let import_id = Uuid::new_v4();
        let span = info_span!("import", import_id = %import_id);
        let _guard = span.enter();

        crate::log_import!(info, operations::IMPORT_STARTED,
            levels: self.schema.len(),
            lineage_fallback: self.config.lineage_fallback
        );

        match self.run(source) {
            Ok(outcome) => {
                crate::log_import!(info, operations::IMPORT_COMPLETED,
                    nodes: outcome.nodes.len(),
                    included: outcome.summary.disposition_summary.included_nodes,
                    discarded: outcome.summary.disposition_summary.discarded_nodes.total,
                    validations: outcome.validations.len()
                );
                Ok(outcome)
            }
            Err(error) => {
                let error = error.into_processing();
                warn!(
                    operation = operations::IMPORT_FAILED,
                    error = %error,
                    "Import failed"
                );
                Err(error)
            }
        }
    }

    /// Read a file and import it.
    pub async fn process_file(&self, path: impl AsRef<Path>) -> ImportResult<ImportOutcome> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| ImportError::Processing {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        self.process(SourceData::Bytes(bytes))
    }

    /// Fetch keyed records from `source` and import them.
    pub async fn process_record_source(&self, source: &dyn RecordSource) -> ImportResult<ImportOutcome> {
        let records = source
            .fetch_records()
            .await
            .map_err(|e| ImportError::Processing {
                message: format!("Failed to fetch records: {e:#}"),
            })?;
        self.process(SourceData::Records {
            records,
            headers: source.headers(),
        })
    }

    fn run(&self, source: SourceData) -> ImportResult<ImportOutcome> {
        self.config.validate()?;

        let default_decoder;
        let decoder: &dyn GridDecoder = match self.decoder {
            Some(decoder) => decoder,
            None => {
                default_decoder = CsvGridDecoder::new(self.config.csv_delimiter_byte());
                &default_decoder
            }
        };

        let table = RowNormalizer::new(decoder, self.config.strict_headers)
            .normalize(source, self.schema)?;

        let mut accumulator = NodeAccumulator::new(self.config.lineage_fallback);
        let offered = self.extract_rows(&table, &mut accumulator)?;

        if accumulator.nodes().is_empty() {
            return Err(ImportError::NoValidNodes);
        }

        if self.config.validate_id_formats {
            let warnings = validate_id_formats(accumulator.nodes(), self.schema);
            accumulator.push_diagnostics(warnings);
        }

        let accumulated = accumulator.finish();
        let build = HierarchyBuilder::with_ledger(accumulated.ledger).build(&accumulated.nodes);

        let placed = build.hierarchy.node_count();
        if build.ledger.total() != offered || build.ledger.included_count() != placed {
            return Err(ImportError::HierarchyBuild(format!(
                "disposition ledger out of balance: {} extracted, {} recorded, {} included, {} placed",
                offered,
                build.ledger.total(),
                build.ledger.included_count(),
                placed
            )));
        }

        let mut validations = accumulated.diagnostics;
        validations.extend(build.validation_errors);

        let summary = ImportSummary::assemble(
            &accumulated.nodes,
            &validations,
            build.orphans.len(),
            &accumulated.duplicates,
            build.ledger.summary(),
        );

        Ok(ImportOutcome {
            nodes: accumulated.nodes,
            hierarchy: build.hierarchy,
            validations,
            summary,
        })
    }

    /// Extract every row into the accumulator, returning how many nodes were
    /// offered to it.
    fn extract_rows(&self, table: &NormalizedTable, accumulator: &mut NodeAccumulator) -> ImportResult<usize> {
        let extractor = NodeExtractor::new(self.schema, self.resolver);
        let row_limit = self.config.max_rows.unwrap_or(usize::MAX).min(table.len());
        if row_limit < table.len() {
            info!(
                rows = table.len(),
                max_rows = row_limit,
                "Row limit reached; remaining rows are ignored"
            );
        }

        let mut offered = 0;
        for index in 0..row_limit {
            if self.is_cancelled() {
                warn!(
                    operation = operations::IMPORT_CANCELLED,
                    rows_processed = index,
                    "Import cancelled"
                );
                return Err(ImportError::Cancelled { rows_processed: index });
            }

            match extractor.extract(table, index) {
                Ok(nodes) => {
                    for node in nodes {
                        offered += 1;
                        accumulator.accept(node);
                    }
                }
                Err(error) => {
                    let (row_index, message) = match error {
                        ImportError::RowProcessing { row_index, message } => (row_index, message),
                        other => (table.row_number(index), other.to_string()),
                    };
                    warn!(
                        operation = operations::ROW_FAILED,
                        row = row_index,
                        error = %message,
                        "Row skipped"
                    );
                    accumulator.record_row_error(row_index, message);
                }
            }
        }

        Ok(offered)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationFlag::is_cancelled)
    }
}

/// Import `source` with default settings.
pub fn process_source(
    source: SourceData,
    schema: &LevelSchema,
    resolver: &dyn PredecessorResolver,
) -> ImportResult<ImportOutcome> {
    ImportProcessor::new(schema, resolver).process(source)
}
