//! The query aggregate and its parts
//!
//! A `Query` bundles a source with an optional constraint, orderings,
//! columns, and a limit. The source is the only required part; every
//! other field defaults to empty-but-valid.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::constraint::Constraint;
use super::errors::{QomError, QomResult};
use super::operand::DynamicOperand;
use super::readable::readable;
use super::source::Source;

/// Marker for "all properties" in a wildcard column
pub const WILDCARD: &str = "*";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    /// Returns the rendering keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }
}

/// One sort key: an operand paired with a direction.
///
/// Orderings are evaluated left-to-right as a lexicographic key; the
/// first is the primary sort key, later ones break ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    /// Operand producing the sort key
    pub operand: DynamicOperand,
    /// Sort direction
    pub order: Order,
}

impl Ordering {
    /// Creates an ascending ordering
    pub fn ascending(operand: DynamicOperand) -> Self {
        Self {
            operand,
            order: Order::Ascending,
        }
    }

    /// Creates a descending ordering
    pub fn descending(operand: DynamicOperand) -> Self {
        Self {
            operand,
            order: Order::Descending,
        }
    }
}

/// A projected column: `(selector_name, property_name, column_name)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Selector the column reads from
    pub selector_name: String,
    /// Property projected, or the wildcard marker
    pub property_name: String,
    /// Name the column is exposed under, or the wildcard marker
    pub column_name: String,
}

impl Column {
    /// Creates a column projecting one property.
    pub fn new(
        selector_name: impl Into<String>,
        property_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> QomResult<Self> {
        let selector_name = selector_name.into();
        let property_name = property_name.into();
        let column_name = column_name.into();

        if selector_name.is_empty() {
            return Err(QomError::empty_name("Column selector name"));
        }
        if property_name.is_empty() {
            return Err(QomError::empty_name("Column property name"));
        }
        if column_name.is_empty() {
            return Err(QomError::empty_name("Column name"));
        }

        Ok(Self {
            selector_name,
            property_name,
            column_name,
        })
    }

    /// Creates a wildcard column denoting all properties of a selector.
    pub fn all_of(selector_name: impl Into<String>) -> QomResult<Self> {
        Self::new(selector_name, WILDCARD, WILDCARD)
    }

    /// Returns true if this column denotes all properties of its selector
    pub fn is_wildcard(&self) -> bool {
        self.property_name == WILDCARD
    }

    /// Returns a copy of this column bound to a different selector.
    ///
    /// Used when resolving aliases; the original column is unchanged.
    pub fn with_selector(&self, selector_name: impl Into<String>) -> Self {
        Self {
            selector_name: selector_name.into(),
            property_name: self.property_name.clone(),
            column_name: self.column_name.clone(),
        }
    }
}

/// Pagination bounds: row count plus starting offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Limit {
    /// Maximum number of rows returned
    pub row_count: u64,
    /// Number of leading rows skipped
    pub offset: u64,
}

impl Limit {
    /// Creates a limit, rejecting a zero row count.
    pub fn new(row_count: u64, offset: u64) -> QomResult<Self> {
        if row_count == 0 {
            return Err(QomError::invalid_limit());
        }
        Ok(Self { row_count, offset })
    }

    /// Creates a limit with no offset.
    pub fn rows(row_count: u64) -> QomResult<Self> {
        Self::new(row_count, 0)
    }
}

/// An immutable query over typed content.
///
/// Built with `Query::new` plus `with_*` methods; the tree is never
/// mutated afterwards. Equality is structural; hashing goes through the
/// canonical rendering, which is deterministic for equal trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// The content the query ranges over (required)
    pub source: Source,
    /// Row filter (optional)
    pub constraint: Option<Constraint>,
    /// Sort keys, primary first (defaults to empty)
    pub orderings: Vec<Ordering>,
    /// Projected columns; empty means all columns
    pub columns: Vec<Column>,
    /// Pagination bounds (optional)
    pub limit: Option<Limit>,
}

impl Query {
    /// Creates a query over the given source with no constraint,
    /// orderings, columns, or limit.
    pub fn new(source: impl Into<Source>) -> Self {
        Self {
            source: source.into(),
            constraint: None,
            orderings: Vec::new(),
            columns: Vec::new(),
            limit: None,
        }
    }

    /// Sets the constraint
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Appends an ordering
    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    /// Appends a column
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the limit
    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Validates that every column and ordering references a selector
    /// the source exposes.
    ///
    /// The executor calls this before resolving selectors; standalone
    /// callers may validate earlier for better diagnostics.
    pub fn validate(&self) -> QomResult<()> {
        for column in &self.columns {
            if !self.source.exposes(&column.selector_name) {
                return Err(QomError::unknown_selector(&column.selector_name));
            }
        }

        for ordering in &self.orderings {
            let name = ordering.operand.selector_name();
            if !self.source.exposes(name) {
                return Err(QomError::unknown_selector(name));
            }
        }

        Ok(())
    }
}

// Structural equality via PartialEq is total over the trees we build;
// the marker impl lets Query live in hash-keyed collections.
impl Eq for Query {}

impl Hash for Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // serde_json::Value literals are not Hash; the canonical
        // rendering is deterministic and agrees with structural equality
        readable(self).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qom::source::Selector;
    use serde_json::json;
    use std::collections::HashSet;

    fn doc_source() -> Source {
        Source::Selector(Selector::new("Document", "docs").unwrap())
    }

    #[test]
    fn test_defaults_are_empty_but_valid() {
        let query = Query::new(doc_source());

        assert!(query.constraint.is_none());
        assert!(query.orderings.is_empty());
        assert!(query.columns.is_empty());
        assert!(query.limit.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_column_empty_names_rejected() {
        assert!(Column::new("", "title", "title").is_err());
        assert!(Column::new("docs", "", "title").is_err());
        assert!(Column::new("docs", "title", "").is_err());
    }

    #[test]
    fn test_wildcard_column() {
        let column = Column::all_of("docs").unwrap();
        assert!(column.is_wildcard());
        assert_eq!(column.property_name, WILDCARD);
        assert_eq!(column.column_name, WILDCARD);

        let narrow = Column::new("docs", "title", "title").unwrap();
        assert!(!narrow.is_wildcard());
    }

    #[test]
    fn test_with_selector_rebinds_copy() {
        let column = Column::new("docs", "title", "t").unwrap();
        let rebound = column.with_selector("d2");

        assert_eq!(rebound.selector_name, "d2");
        assert_eq!(rebound.property_name, "title");
        assert_eq!(column.selector_name, "docs");
    }

    #[test]
    fn test_zero_row_count_rejected() {
        assert!(Limit::new(0, 10).is_err());
        assert!(Limit::new(1, 0).is_ok());
    }

    #[test]
    fn test_unknown_selector_in_column_rejected() {
        let query = Query::new(doc_source()).with_column(Column::new("other", "x", "x").unwrap());

        let result = query.validate();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code().code(), "QRY_QOM_UNKNOWN_SELECTOR");
    }

    #[test]
    fn test_unknown_selector_in_ordering_rejected() {
        let query = Query::new(doc_source())
            .with_ordering(Ordering::ascending(DynamicOperand::property("other", "x")));

        assert!(query.validate().is_err());
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let build = || {
            Query::new(doc_source())
                .with_constraint(Constraint::property_eq("docs", "status", json!("published")))
                .with_limit(Limit::rows(10).unwrap())
        };

        let a = build();
        let b = build();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
