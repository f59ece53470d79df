//! Type catalog subsystem for quarry
//!
//! The schema collaborator surface the engine consumes: typed tables
//! with column metadata, subtype edges, and per-type marker placement.
//! The durable catalog lives upstream; this module defines the
//! read-only trait plus an in-memory registry used for wiring and tests.
//!
//! # Design Principles
//!
//! - Read-only from the engine's perspective
//! - Deterministic: subtype enumeration is sorted, catalog lookups are
//!   order-independent
//! - Marker-aware: primary and auxiliary (mixin-style) type markers are
//!   stored in different index fields

mod catalog;
mod errors;
mod types;

pub use catalog::{InMemoryTypeCatalog, TypeCatalog};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use types::{ColumnDef, MarkerKind, PropertyKind, Table};
