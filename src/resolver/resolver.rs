//! Table resolver
//!
//! Compiles `(type_name, include_subtypes)` into a type predicate
//! against the catalog.

use std::collections::{HashSet, VecDeque};

use crate::observability::{Event, Logger, Severity};
use crate::schema::TypeCatalog;

use super::predicate::{TypePredicate, TypeTerm};

/// Resolves logical type names into index predicates
pub struct TableResolver<'a, C: TypeCatalog + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: TypeCatalog + ?Sized> TableResolver<'a, C> {
    /// Creates a resolver over the given catalog
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Resolves a type name into an index predicate.
    ///
    /// The named type always contributes its own term. With
    /// `include_subtypes`, every descendant flagged as included in
    /// supertype queries contributes one more; an excluded intermediate
    /// type is skipped but its own descendants are still walked.
    ///
    /// Unknown type names resolve to `MatchNothing` and a warning event.
    pub fn resolve(&self, type_name: &str, include_subtypes: bool) -> TypePredicate {
        let Some(base) = self.catalog.table(type_name) else {
            Logger::log(
                Severity::Warn,
                Event::TypeNotFound,
                &[("type_name", type_name)],
            );
            return TypePredicate::MatchNothing;
        };

        let mut terms = vec![TypeTerm::new(base.marker.index_field(), type_name)];

        if include_subtypes {
            // Iterative breadth-first walk; sorted children keep the
            // term order deterministic
            let mut visited: HashSet<String> = HashSet::new();
            visited.insert(type_name.to_string());

            let mut queue: VecDeque<String> = self.catalog.subtypes(type_name).into();

            while let Some(subtype_name) = queue.pop_front() {
                if !visited.insert(subtype_name.clone()) {
                    continue;
                }

                queue.extend(self.catalog.subtypes(&subtype_name));

                let Some(subtype) = self.catalog.table(&subtype_name) else {
                    Logger::log(
                        Severity::Warn,
                        Event::TypeNotFound,
                        &[("type_name", subtype_name.as_str())],
                    );
                    continue;
                };

                if subtype.included_in_supertype_query {
                    terms.push(TypeTerm::new(subtype.marker.index_field(), subtype_name));
                }
            }
        }

        TypePredicate::from_terms(terms)
    }
}
