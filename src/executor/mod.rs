//! Query executor subsystem for quarry
//!
//! Consumes a query object model and produces ordered, paginated rows
//! from a segment snapshot.
//!
//! # Execution Flow (strict order)
//!
//! 1. Validate the query against its source's selector names
//! 2. Resolve the selector's type into an index predicate
//! 3. Scan the snapshot's visible documents through the predicate
//! 4. Filter matches strictly by the constraint tree
//! 5. Order rows with the compiled comparator
//! 6. Apply offset and row count
//! 7. Return rows with scan statistics
//!
//! # Invariants
//!
//! - Deterministic: same query + same snapshot = same rows
//! - Degrading: an unknown type yields an empty result, an unsupported
//!   sort key yields stable-but-unordered ties; neither aborts the query

mod errors;
mod executor;
mod filter;
mod result;
mod sorter;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::QueryExecutor;
pub use filter::ConstraintFilter;
pub use result::{QueryResult, ResultRow};
pub use sorter::RowSorter;
