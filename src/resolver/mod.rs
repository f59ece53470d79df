//! Table resolver subsystem for quarry
//!
//! Turns a selector's declared type name into an index predicate
//! selecting all matching stored type markers, expanding the type
//! hierarchy when subtypes are requested.
//!
//! # Design Principles
//!
//! - Deterministic: subtype expansion walks the hierarchy in sorted
//!   breadth-first order, so the same catalog yields the same predicate
//! - Iterative: hierarchies of any depth are supported without recursion
//! - Degrading: unknown type names resolve to a match-nothing predicate
//!   and a warning event, never an error

mod predicate;
mod resolver;

pub use predicate::{TypePredicate, TypeTerm};
pub use resolver::TableResolver;
