//! Indexed documents
//!
//! The flattened, index-side representation of a content entry: type
//! markers split into their primary and mixin fields, property values in
//! their indexed form, and a concatenated full-text body.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{ContentEntry, PropertyValue};

/// One indexed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Content entry id this document mirrors
    pub id: String,
    /// Repository path
    pub path: String,
    /// Node name (last path segment)
    pub name: String,
    /// Primary type marker
    pub primary_type: String,
    /// Auxiliary type markers
    pub mixin_types: BTreeSet<String>,
    /// Indexed property values
    pub properties: BTreeMap<String, Value>,
    /// Property lengths, kept for length-based ordering
    pub property_lengths: BTreeMap<String, u64>,
    /// Concatenated text body for full-text search
    pub fulltext: String,
}

impl IndexDocument {
    /// Flattens a content entry into its indexed form.
    pub fn from_entry(entry: &ContentEntry) -> Self {
        let mut properties = BTreeMap::new();
        let mut property_lengths = BTreeMap::new();
        let mut fulltext = String::new();

        for (name, value) in &entry.properties {
            properties.insert(name.clone(), value.to_index_value());
            property_lengths.insert(name.clone(), value.length());

            // Only textual values join the full-text body
            if let PropertyValue::String { value } = value {
                if !fulltext.is_empty() {
                    fulltext.push(' ');
                }
                fulltext.push_str(value);
            }
        }

        Self {
            id: entry.id.clone(),
            path: entry.path.clone(),
            name: entry.name().to_string(),
            primary_type: entry.primary_type.clone(),
            mixin_types: entry.mixin_types.clone(),
            properties,
            property_lengths,
            fulltext,
        }
    }

    /// The node's local name: the part after the namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Returns true if the document's text matches every term of a
    /// full-text expression, case-insensitively.
    ///
    /// A property name narrows the search to that property's text.
    pub fn fulltext_matches(&self, property_name: Option<&str>, expression: &str) -> bool {
        self.fulltext_score(property_name, expression) > 0
    }

    /// Returns how many terms of the expression the document's text
    /// contains. Zero means no match; all terms must be present.
    pub fn fulltext_score(&self, property_name: Option<&str>, expression: &str) -> u64 {
        let haystack = match property_name {
            Some(name) => match self.properties.get(name) {
                Some(Value::String(s)) => s.to_lowercase(),
                _ => return 0,
            },
            None => self.fulltext.to_lowercase(),
        };

        let mut score = 0u64;
        for term in expression.split_whitespace() {
            if haystack.contains(&term.to_lowercase()) {
                score += 1;
            } else {
                return 0;
            }
        }
        score
    }
}
