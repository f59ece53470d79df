//! Content entry subsystem for quarry
//!
//! The unit of upstream data the index-mutation commands operate on.
//! Entries are created by the repository's object store and only read
//! here; binary property values are streamed on demand through the
//! content source rather than held inline.

mod entry;
mod source;

pub use entry::{ContentEntry, PropertyValue};
pub use source::ContentSource;
