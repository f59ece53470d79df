//! Compiled type predicates

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One term: a type marker in a specific index field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTerm {
    /// Index field the marker is stored in
    pub field: String,
    /// Type name the marker must equal
    pub type_name: String,
}

impl TypeTerm {
    /// Creates a term
    pub fn new(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            type_name: type_name.into(),
        }
    }
}

/// The index predicate a type name resolves to.
///
/// Zero terms match nothing, one term is a direct marker check, and
/// several terms form a disjunction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "predicate", rename_all = "snake_case")]
pub enum TypePredicate {
    /// Matches no document
    MatchNothing,
    /// A single marker term
    Term(TypeTerm),
    /// A disjunction over marker terms
    AnyOf { terms: Vec<TypeTerm> },
}

impl TypePredicate {
    /// Builds a predicate from resolved terms.
    pub fn from_terms(terms: Vec<TypeTerm>) -> Self {
        match terms.len() {
            0 => TypePredicate::MatchNothing,
            1 => TypePredicate::Term(terms.into_iter().next().expect("len checked")),
            _ => TypePredicate::AnyOf { terms },
        }
    }

    /// Returns the terms of this predicate, empty for match-nothing
    pub fn terms(&self) -> &[TypeTerm] {
        match self {
            TypePredicate::MatchNothing => &[],
            TypePredicate::Term(term) => std::slice::from_ref(term),
            TypePredicate::AnyOf { terms } => terms,
        }
    }

    /// Evaluates this predicate against a document's stored markers.
    pub fn matches(&self, primary_type: &str, mixin_types: &BTreeSet<String>) -> bool {
        self.terms().iter().any(|term| match term.field.as_str() {
            "primary_type" => term.type_name == primary_type,
            "mixin_types" => mixin_types.contains(&term.type_name),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixins(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_terms_shapes() {
        assert_eq!(TypePredicate::from_terms(vec![]), TypePredicate::MatchNothing);

        let one = TypePredicate::from_terms(vec![TypeTerm::new("primary_type", "Document")]);
        assert!(matches!(one, TypePredicate::Term(_)));

        let many = TypePredicate::from_terms(vec![
            TypeTerm::new("primary_type", "Document"),
            TypeTerm::new("primary_type", "Image"),
        ]);
        assert!(matches!(many, TypePredicate::AnyOf { .. }));
        assert_eq!(many.terms().len(), 2);
    }

    #[test]
    fn test_match_nothing_matches_nothing() {
        let predicate = TypePredicate::MatchNothing;
        assert!(!predicate.matches("Document", &mixins(&["Versionable"])));
    }

    #[test]
    fn test_primary_and_mixin_fields_checked_separately() {
        let predicate = TypePredicate::from_terms(vec![
            TypeTerm::new("primary_type", "Document"),
            TypeTerm::new("mixin_types", "Versionable"),
        ]);

        assert!(predicate.matches("Document", &mixins(&[])));
        assert!(predicate.matches("Folder", &mixins(&["Versionable"])));
        // A mixin marker does not satisfy a primary term
        assert!(!predicate.matches("Versionable", &mixins(&["Document"])));
    }
}
