//! Content entries and typed property values

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::PropertyKind;

/// A typed property value of a content entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PropertyValue {
    String { value: String },
    Long { value: i64 },
    Double { value: f64 },
    Boolean { value: bool },
    DateTime { value: DateTime<Utc> },
    Name { value: String },
    Path { value: String },
    /// Binary payload; only the size is carried, bytes are streamed on
    /// demand through the content source
    Binary { size: u64 },
}

impl PropertyValue {
    /// Returns the kind of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::String { .. } => PropertyKind::String,
            PropertyValue::Long { .. } => PropertyKind::Long,
            PropertyValue::Double { .. } => PropertyKind::Double,
            PropertyValue::Boolean { .. } => PropertyKind::Boolean,
            PropertyValue::DateTime { .. } => PropertyKind::DateTime,
            PropertyValue::Name { .. } => PropertyKind::Name,
            PropertyValue::Path { .. } => PropertyKind::Path,
            PropertyValue::Binary { .. } => PropertyKind::Binary,
        }
    }

    /// Returns the value's length: character count for text kinds,
    /// byte size for binaries, digit/text length otherwise.
    pub fn length(&self) -> u64 {
        match self {
            PropertyValue::String { value }
            | PropertyValue::Name { value }
            | PropertyValue::Path { value } => value.chars().count() as u64,
            PropertyValue::Long { value } => value.to_string().len() as u64,
            PropertyValue::Double { value } => value.to_string().len() as u64,
            PropertyValue::Boolean { value } => value.to_string().len() as u64,
            PropertyValue::DateTime { value } => value.to_rfc3339().len() as u64,
            PropertyValue::Binary { size } => *size,
        }
    }

    /// Converts this value to its indexed representation.
    ///
    /// Datetimes index as RFC 3339 strings so index-side comparison
    /// agrees with chronological order; binaries index as their size.
    pub fn to_index_value(&self) -> Value {
        match self {
            PropertyValue::String { value }
            | PropertyValue::Name { value }
            | PropertyValue::Path { value } => Value::String(value.clone()),
            PropertyValue::Long { value } => Value::from(*value),
            PropertyValue::Double { value } => {
                serde_json::Number::from_f64(*value).map_or(Value::Null, Value::Number)
            }
            PropertyValue::Boolean { value } => Value::Bool(*value),
            PropertyValue::DateTime { value } => {
                Value::String(value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
            }
            PropertyValue::Binary { size } => Value::from(*size),
        }
    }
}

/// One entry of the content repository.
///
/// Created upstream; this core only reads it when applying index
/// mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Stable identifier
    pub id: String,
    /// Repository path of the entry
    pub path: String,
    /// Primary declared type
    pub primary_type: String,
    /// Auxiliary (mixin-style) declared types
    pub mixin_types: BTreeSet<String>,
    /// Parent entry ids
    pub parents: BTreeSet<String>,
    /// Typed property values keyed by name
    pub properties: BTreeMap<String, PropertyValue>,
}

impl ContentEntry {
    /// Creates an entry with no mixins, parents, or properties.
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        primary_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            primary_type: primary_type.into(),
            mixin_types: BTreeSet::new(),
            parents: BTreeSet::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Adds a mixin type
    pub fn with_mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixin_types.insert(mixin.into());
        self
    }

    /// Adds a parent reference
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parents.insert(parent_id.into());
        self
    }

    /// Adds a property value
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Returns all declared type names, primary first
    pub fn type_names(&self) -> Vec<&str> {
        let mut names = vec![self.primary_type.as_str()];
        names.extend(self.mixin_types.iter().map(String::as_str));
        names
    }

    /// Returns the entry's node name (last path segment)
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}
