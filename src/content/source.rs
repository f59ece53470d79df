//! Content source trait
//!
//! The live object store the repository keeps entries in. The engine
//! reads entries and child listings through this seam when executing
//! fetch commands; tests substitute an in-memory map.

use super::entry::ContentEntry;

/// Read access to the repository's live object store
pub trait ContentSource {
    /// Returns the entry with the given id, if it exists
    fn entry(&self, id: &str) -> Option<ContentEntry>;

    /// Returns the children of the given parent id, sorted by id.
    ///
    /// An unknown parent yields an empty list.
    fn children(&self, parent_id: &str) -> Vec<ContentEntry>;

    /// Streams the bytes of a binary property.
    ///
    /// Returns None when the entry or property does not exist or the
    /// property is not binary.
    fn read_binary(&self, id: &str, property_name: &str) -> Option<Vec<u8>>;
}
