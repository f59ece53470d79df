//! Query Object Model subsystem for quarry
//!
//! The immutable AST a parsed query is represented as. The textual
//! parser is an external collaborator; this module only defines the
//! model, its validation, and its canonical rendering.
//!
//! # Design Principles
//!
//! - Immutable: nodes are never mutated after construction; any
//!   transformation (alias rewriting, case wrapping) produces a new tree
//! - Exhaustive: consumers traverse nodes with exhaustive `match`, so a
//!   new node kind fails compilation in every traversal
//! - Canonical: `readable()` renders any query to one deterministic
//!   string form, used for diagnostics and round-trip testing

mod constraint;
mod errors;
mod operand;
mod query;
mod readable;
mod source;

pub use constraint::{ComparisonOperator, Constraint};
pub use errors::{QomError, QomErrorCode, QomResult};
pub use operand::{DynamicOperand, StaticOperand};
pub use query::{Column, Limit, Order, Ordering, Query, WILDCARD};
pub use readable::readable;
pub use source::{Join, JoinCondition, JoinType, Selector, Source};
