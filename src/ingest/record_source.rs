//! Record sources for DB-mode imports.

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Supplies keyed records, e.g. rows fetched from a database query.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every record for one import.
    async fn fetch_records(&self) -> anyhow::Result<Vec<Map<String, Value>>>;

    /// Ordered header list. `None` means "use the schema's declared columns".
    fn headers(&self) -> Option<Vec<String>> {
        None
    }
}

/// In-memory record source.
#[derive(Debug, Clone, Default)]
pub struct StaticRecordSource {
    records: Vec<Map<String, Value>>,
    headers: Option<Vec<String>>,
}

impl StaticRecordSource {
    pub fn new(records: Vec<Map<String, Value>>) -> Self {
        Self {
            records,
            headers: None,
        }
    }

    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl RecordSource for StaticRecordSource {
    async fn fetch_records(&self) -> anyhow::Result<Vec<Map<String, Value>>> {
        Ok(self.records.clone())
    }

    fn headers(&self) -> Option<Vec<String>> {
        self.headers.clone()
    }
}
