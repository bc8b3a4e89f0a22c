//! Input validation for hierarchy imports
//!
//! Bounds on header names and cell values, and the dash-delimited `id_format`
//! template check.

use serde_json::Value;
use std::collections::HashSet;

use crate::constants::{MAX_CELL_LENGTH, MAX_HEADER_LENGTH};
use crate::error::{ImportError, ImportResult};
use crate::models::{Diagnostic, Node};
use crate::schema::LevelSchema;

/// Validates the headers of the columns the schema reads.
///
/// Blank headers and headers of unread columns are ignored; a read column
/// must not be oversized or repeated.
pub fn validate_headers(headers: &[String], read_columns: &[String]) -> ImportResult<()> {
    let mut seen = HashSet::new();
    for (index, header) in headers.iter().enumerate() {
        if header.trim().is_empty() || !read_columns.contains(header) {
            continue;
        }

        if header.chars().count() > MAX_HEADER_LENGTH {
            return Err(ImportError::invalid_input(format!(
                "Header in column {} too long: {} chars (max: {MAX_HEADER_LENGTH})",
                index + 1,
                header.chars().count()
            )));
        }

        if !seen.insert(header.as_str()) {
            return Err(ImportError::invalid_input(format!(
                "Duplicate header '{header}'"
            )));
        }
    }

    Ok(())
}

/// Validates the cells an extractor reads against the size limit.
///
/// Length is measured in characters.
pub fn validate_row_cells<'a>(
    cells: impl IntoIterator<Item = (&'a str, &'a Value)>,
) -> Result<(), String> {
    for (column, cell) in cells {
        if let Value::String(s) = cell {
            let length = s.chars().count();
            if length > MAX_CELL_LENGTH {
                return Err(format!(
                    "Cell in column '{column}' too long: {length} chars (max: {MAX_CELL_LENGTH})"
                ));
            }
        }
    }

    Ok(())
}

/// Checks an id against a dash-delimited template.
///
/// Template characters: `N` digit, `A` ASCII letter, `X` ASCII alphanumeric;
/// anything else must match literally. A backslash makes the next character
/// literal, so `\N\A\V-NNN` accepts `NAV-001`. Segment counts and lengths
/// must agree.
pub fn matches_id_format(id: &str, template: &str) -> bool {
    let id_segments: Vec<&str> = id.split('-').collect();
    let template_segments: Vec<&str> = template.split('-').collect();

    if id_segments.len() != template_segments.len() {
        return false;
    }

    id_segments
        .iter()
        .zip(&template_segments)
        .all(|(segment, pattern)| segment_matches(segment, &pattern_tokens(pattern)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternToken {
    Digit,
    Letter,
    Alphanumeric,
    Literal(char),
}

fn pattern_tokens(pattern: &str) -> Vec<PatternToken> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '\\' => PatternToken::Literal(chars.next().unwrap_or('\\')),
            'N' => PatternToken::Digit,
            'A' => PatternToken::Letter,
            'X' => PatternToken::Alphanumeric,
            literal => PatternToken::Literal(literal),
        });
    }
    tokens
}

fn segment_matches(segment: &str, tokens: &[PatternToken]) -> bool {
    if segment.chars().count() != tokens.len() {
        return false;
    }

    segment.chars().zip(tokens).all(|(c, token)| match token {
        PatternToken::Digit => c.is_ascii_digit(),
        PatternToken::Letter => c.is_ascii_alphabetic(),
        PatternToken::Alphanumeric => c.is_ascii_alphanumeric(),
        PatternToken::Literal(literal) => c == *literal,
    })
}

/// Warns about node ids that do not match their level's `id_format`.
pub fn validate_id_formats(nodes: &[Node], schema: &LevelSchema) -> Vec<Diagnostic> {
    nodes
        .iter()
        .filter_map(|node| {
            let definition = schema.get(node.level)?;
            let template = definition.id_format.as_deref()?;
            (!matches_id_format(&node.id, template))
                .then(|| Diagnostic::invalid_id_format(node, &definition.id_column, template))
        })
        .collect()
}
