//! Predecessor resolution.
//!
//! A level's predecessor column may hold a single id or a list of ids. How the
//! list is written is up to the caller, so resolution goes through the
//! [`PredecessorResolver`] seam.

use anyhow::bail;
use serde_json::Value;

use crate::config::ImportConfig;

/// The row a cell came from, for resolvers that need surrounding context.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub row: &'a [Value],
    pub headers: &'a [String],
    pub row_number: usize,
}

impl<'a> RowContext<'a> {
    /// Cell under `column`, if the column exists.
    pub fn cell(&self, column: &str) -> Option<&'a Value> {
        self.headers
            .iter()
            .position(|header| header == column)
            .and_then(|index| self.row.get(index))
    }
}

/// Turns a raw predecessor cell into predecessor ids.
pub trait PredecessorResolver: Send + Sync {
    fn resolve(&self, raw: &Value, context: &RowContext<'_>) -> anyhow::Result<Vec<String>>;
}

impl<F> PredecessorResolver for F
where
    F: Fn(&Value, &RowContext<'_>) -> anyhow::Result<Vec<String>> + Send + Sync,
{
    fn resolve(&self, raw: &Value, context: &RowContext<'_>) -> anyhow::Result<Vec<String>> {
        self(raw, context)
    }
}

/// Splits string cells on any of a set of delimiter characters.
#[derive(Debug, Clone)]
pub struct DelimitedPredecessorResolver {
    delimiters: Vec<char>,
}

impl DelimitedPredecessorResolver {
    pub fn new(delimiters: Vec<char>) -> Self {
        Self { delimiters }
    }

    fn split(&self, text: &str) -> Vec<String> {
        text.split(|c: char| self.delimiters.contains(&c))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for DelimitedPredecessorResolver {
    fn default() -> Self {
        Self::new(vec![',', ';'])
    }
}

impl From<&ImportConfig> for DelimitedPredecessorResolver {
    fn from(config: &ImportConfig) -> Self {
        Self::new(config.predecessor_delimiters.clone())
    }
}

impl PredecessorResolver for DelimitedPredecessorResolver {
    fn resolve(&self, raw: &Value, _context: &RowContext<'_>) -> anyhow::Result<Vec<String>> {
        match raw {
            Value::Null => Ok(Vec::new()),
            Value::String(text) => Ok(self.split(text)),
            Value::Number(n) => Ok(vec![n.to_string()]),
            Value::Array(items) => {
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(text) => ids.extend(self.split(text)),
                        Value::Number(n) => ids.push(n.to_string()),
                        Value::Null => {}
                        other => bail!("Unsupported predecessor list entry: {other}"),
                    }
                }
                Ok(ids)
            }
            other => bail!("Unsupported predecessor value: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context<'a>(row: &'a [Value], headers: &'a [String]) -> RowContext<'a> {
        RowContext {
            row,
            headers,
            row_number: 2,
        }
    }

    #[test]
    fn test_splits_on_any_delimiter() {
        let resolver = DelimitedPredecessorResolver::default();
        let ids = resolver
            .resolve(&json!("S1, S2;S3 ,, "), &context(&[], &[]))
            .unwrap();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_numbers_arrays_and_null() {
        let resolver = DelimitedPredecessorResolver::new(vec!['|']);
        let ctx = context(&[], &[]);
        assert_eq!(resolver.resolve(&json!(42), &ctx).unwrap(), vec!["42"]);
        assert_eq!(
            resolver.resolve(&json!(["A|B", 7, null]), &ctx).unwrap(),
            vec!["A", "B", "7"]
        );
        assert!(resolver.resolve(&Value::Null, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_delimiters_from_config() {
        let config = ImportConfig {
            predecessor_delimiters: vec!['/'],
            ..ImportConfig::default()
        };
        let resolver = DelimitedPredecessorResolver::from(&config);
        let ids = resolver.resolve(&json!("A/B,C"), &context(&[], &[])).unwrap();
        assert_eq!(ids, vec!["A", "B,C"]);
    }

    #[test]
    fn test_rejects_unsupported_values() {
        let resolver = DelimitedPredecessorResolver::default();
        let ctx = context(&[], &[]);
        assert!(resolver.resolve(&json!({"id": "S1"}), &ctx).is_err());
        assert!(resolver.resolve(&json!(true), &ctx).is_err());
    }

    #[test]
    fn test_closure_resolver_sees_row_context() {
        let headers = vec!["Prefix".to_string()];
        let row = vec![json!("P-")];
        let resolver = |raw: &Value, ctx: &RowContext<'_>| -> anyhow::Result<Vec<String>> {
            let prefix = ctx.cell("Prefix").and_then(Value::as_str).unwrap_or_default();
            Ok(vec![format!("{prefix}{}", raw.as_str().unwrap_or_default())])
        };
        let ids = resolver
            .resolve(&json!("9"), &context(&row, &headers))
            .unwrap();
        assert_eq!(ids, vec!["P-9"]);
    }
}
