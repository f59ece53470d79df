//! Catalog type definitions
//!
//! A `Table` is the catalog's description of one content type: its
//! columns, where its type marker is stored in the index, and whether
//! it participates in supertype queries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Property data kinds a column can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Long,
    /// 64-bit floating point
    Double,
    /// Boolean
    Boolean,
    /// Timestamp with timezone
    DateTime,
    /// Namespaced node name
    Name,
    /// Repository path
    Path,
    /// Binary stream, size known up front
    Binary,
}

impl PropertyKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Long => "long",
            PropertyKind::Double => "double",
            PropertyKind::Boolean => "boolean",
            PropertyKind::DateTime => "datetime",
            PropertyKind::Name => "name",
            PropertyKind::Path => "path",
            PropertyKind::Binary => "binary",
        }
    }
}

/// Where a type's marker is stored in index documents.
///
/// Primary types and auxiliary (mixin-style) types land in different
/// index fields, so predicate compilation must know which one to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Stored in the primary-type field; one per document
    Primary,
    /// Stored in the auxiliary-type field; zero or more per document
    Auxiliary,
}

impl MarkerKind {
    /// Returns the index field this marker kind is stored in
    pub fn index_field(&self) -> &'static str {
        match self {
            MarkerKind::Primary => "primary_type",
            MarkerKind::Auxiliary => "mixin_types",
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column (property) name
    pub name: String,
    /// Data kind
    pub kind: PropertyKind,
}

impl ColumnDef {
    /// Creates a column definition
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Catalog entry for one content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Type name
    pub type_name: String,
    /// Marker placement for this type
    pub marker: MarkerKind,
    /// Whether queries against a supertype include this type
    pub included_in_supertype_query: bool,
    /// Column definitions
    columns: Vec<ColumnDef>,
}

impl Table {
    /// Creates a table with primary marker placement, included in
    /// supertype queries.
    pub fn new(type_name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            type_name: type_name.into(),
            marker: MarkerKind::Primary,
            included_in_supertype_query: true,
            columns,
        }
    }

    /// Switches the marker placement to auxiliary
    pub fn auxiliary(mut self) -> Self {
        self.marker = MarkerKind::Auxiliary;
        self
    }

    /// Excludes this type from supertype queries
    pub fn excluded_from_supertype_query(mut self) -> Self {
        self.included_in_supertype_query = false;
        self
    }

    /// Returns all columns in declaration order
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the column with the given name, if declared
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns columns keyed by name
    pub fn columns_by_name(&self) -> HashMap<&str, &ColumnDef> {
        self.columns.iter().map(|c| (c.name.as_str(), c)).collect()
    }
}
