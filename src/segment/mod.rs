//! Index segment subsystem for quarry
//!
//! Segments are append-only units of indexed documents. Mutations
//! accumulate into a batch, flushing seals the batch into an immutable
//! segment, and the merge policy periodically folds sealed segments into
//! one.
//!
//! # Design Principles
//!
//! - Immutable once sealed: a merge produces a replacement segment, it
//!   never rewrites inputs
//! - Copy-on-write: readers hold an `Arc` snapshot of the sealed set for
//!   a whole query; installing a merge swaps in a new view
//! - Explicit disposal: superseded segments are retired first and
//!   disposed in a separate step, so in-flight readers are undisturbed
//! - Failed merges leave the segment set unchanged
//!
//! # Lifecycle
//!
//! `active (batch) -> sealed (queryable) -> merged-away (pending
//! disposal) -> disposed`

mod document;
mod errors;
mod manager;
mod merge_policy;
mod segment;
mod store;

pub use document::IndexDocument;
pub use errors::{SegmentError, SegmentErrorCode, SegmentResult};
pub use manager::{SegmentManager, SegmentSnapshot};
pub use merge_policy::{MergeConfig, MergePolicy};
pub use segment::{MutationBatch, Segment, SegmentId};
pub use store::{MemorySegmentStore, SegmentStore};
