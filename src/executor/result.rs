//! Execution results

use std::collections::BTreeMap;

use serde_json::Value;

use crate::qom::{Column, WILDCARD};
use crate::segment::IndexDocument;

/// One result row: a document matched under a selector name
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Selector this row was matched under
    pub selector_name: String,
    /// Full-text relevance score of the match (0 without full-text)
    pub score: u64,
    /// The matched document
    pub document: IndexDocument,
}

impl ResultRow {
    /// Creates a row
    pub fn new(selector_name: impl Into<String>, score: u64, document: IndexDocument) -> Self {
        Self {
            selector_name: selector_name.into(),
            score,
            document,
        }
    }

    /// Projects this row through the query's columns.
    ///
    /// An empty column list and wildcard columns both yield all
    /// properties; named columns are exposed under their column name.
    pub fn project(&self, columns: &[Column]) -> BTreeMap<String, Value> {
        let wants_all = columns.is_empty()
            || columns
                .iter()
                .any(|c| c.selector_name == self.selector_name && c.is_wildcard());

        if wants_all {
            return self.document.properties.clone();
        }

        let mut projected = BTreeMap::new();
        for column in columns {
            if column.selector_name != self.selector_name {
                continue;
            }
            if let Some(value) = self.document.properties.get(&column.property_name) {
                let name = if column.column_name == WILDCARD {
                    column.property_name.clone()
                } else {
                    column.column_name.clone()
                };
                projected.insert(name, value.clone());
            }
        }
        projected
    }
}

/// The outcome of executing one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Ordered, paginated rows
    pub rows: Vec<ResultRow>,
    /// Number of rows returned
    pub returned_count: usize,
    /// Number of visible documents scanned
    pub scanned_count: usize,
    /// Whether the row-count limit truncated the result
    pub limit_applied: bool,
}
