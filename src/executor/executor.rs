//! Query executor
//!
//! Drives one query through resolution, scanning, filtering, ordering,
//! and pagination against a stable segment snapshot.

use std::collections::HashMap;

use serde_json::Value;

use crate::observability::{Event, Logger, Severity};
use crate::qom::{Constraint, Query, Source};
use crate::resolver::TableResolver;
use crate::schema::TypeCatalog;
use crate::segment::{IndexDocument, SegmentSnapshot};

use super::errors::{ExecutorError, ExecutorResult};
use super::filter::ConstraintFilter;
use super::result::{QueryResult, ResultRow};
use super::sorter::RowSorter;

/// Executes queries against segment snapshots
pub struct QueryExecutor<'a, C: TypeCatalog> {
    catalog: &'a C,
    include_subtypes: bool,
}

impl<'a, C: TypeCatalog> QueryExecutor<'a, C> {
    /// Creates an executor that expands selectors into their subtypes
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            include_subtypes: true,
        }
    }

    /// Restricts selectors to their exact type, without subtypes
    pub fn without_subtypes(mut self) -> Self {
        self.include_subtypes = false;
        self
    }

    /// Executes a query against a snapshot.
    ///
    /// The snapshot stays stable for the whole execution; concurrent
    /// seals and merges install new views without touching it.
    pub fn execute(
        &self,
        query: &Query,
        snapshot: &SegmentSnapshot,
        bindings: &HashMap<String, Value>,
    ) -> ExecutorResult<QueryResult> {
        query.validate()?;

        let selector = match &query.source {
            Source::Selector(s) => s,
            Source::Join(_) => {
                return Err(ExecutorError::unsupported_source(
                    "Join execution is not supported; execute each selector separately",
                ));
            }
        };

        let resolver = TableResolver::new(self.catalog);
        let predicate = resolver.resolve(&selector.node_type, self.include_subtypes);

        let filter = ConstraintFilter::new(bindings);

        let mut rows = Vec::new();
        let mut scanned_count = 0;

        for document in snapshot.visible_documents() {
            scanned_count += 1;

            if !predicate.matches(&document.primary_type, &document.mixin_types) {
                continue;
            }

            let score = query
                .constraint
                .as_ref()
                .map(|constraint| fulltext_score(document, constraint))
                .unwrap_or(0);

            if let Some(constraint) = &query.constraint {
                if !filter.matches(document, score, constraint)? {
                    continue;
                }
            }

            rows.push(ResultRow::new(
                &selector.selector_name,
                score,
                document.clone(),
            ));
        }

        let sorter = RowSorter::compile(&query.orderings);
        sorter.sort(&mut rows);

        let mut limit_applied = false;
        if let Some(limit) = &query.limit {
            let offset = (limit.offset as usize).min(rows.len());
            rows.drain(..offset);

            let row_count = limit.row_count as usize;
            limit_applied = rows.len() > row_count;
            rows.truncate(row_count);
        }

        let result = QueryResult {
            returned_count: rows.len(),
            scanned_count,
            limit_applied,
            rows,
        };

        Logger::log(
            Severity::Trace,
            Event::QueryExecuted,
            &[
                ("returned_count", &result.returned_count.to_string()),
                ("scanned_count", &result.scanned_count.to_string()),
                ("selector", &selector.selector_name),
            ],
        );

        Ok(result)
    }
}

/// Sums the full-text term hits of every search node in the constraint.
///
/// Only used for scoring; membership is decided by the filter.
fn fulltext_score(document: &IndexDocument, constraint: &Constraint) -> u64 {
    match constraint {
        Constraint::And { left, right } | Constraint::Or { left, right } => {
            fulltext_score(document, left) + fulltext_score(document, right)
        }
        Constraint::Not { constraint } => fulltext_score(document, constraint),
        Constraint::FullTextSearch {
            property_name,
            expression,
            ..
        } => document.fulltext_score(property_name.as_deref(), expression),
        Constraint::Comparison { .. }
        | Constraint::PropertyExistence { .. }
        | Constraint::DescendantNode { .. } => 0,
    }
}
