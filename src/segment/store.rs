//! Segment store: the index-factory seam
//!
//! Sealing a batch into a segment, merging segments, and disposing
//! superseded ones are delegated here. Durable stores live outside this
//! crate; the in-memory store backs tests and single-process use.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use chrono::Utc;

use super::errors::{SegmentError, SegmentResult};
use super::segment::{MutationBatch, Segment, SegmentId};

/// Creates, merges, and disposes segments
pub trait SegmentStore {
    /// Seals a mutation batch into a new segment.
    ///
    /// Fails on an empty batch; a segment must hold at least one
    /// mutation.
    fn create(&mut self, batch: MutationBatch, sequence: u64) -> SegmentResult<Segment>;

    /// Merges the input segments into one replacement segment.
    ///
    /// The merged segment's live document set equals the union of the
    /// inputs' live sets (higher sequences shadow lower ones), and its
    /// last-modified time is no earlier than the latest input.
    fn merge(&mut self, inputs: &[Arc<Segment>]) -> SegmentResult<Segment>;

    /// Releases a superseded segment's resources.
    fn dispose(&mut self, id: SegmentId) -> SegmentResult<()>;
}

/// In-memory segment store
#[derive(Debug, Default)]
pub struct MemorySegmentStore {
    disposed: HashSet<SegmentId>,
}

impl MemorySegmentStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the given segment was disposed
    pub fn is_disposed(&self, id: SegmentId) -> bool {
        self.disposed.contains(&id)
    }

    /// Number of disposed segments
    pub fn disposed_count(&self) -> usize {
        self.disposed.len()
    }
}

impl SegmentStore for MemorySegmentStore {
    fn create(&mut self, batch: MutationBatch, sequence: u64) -> SegmentResult<Segment> {
        if batch.is_empty() {
            return Err(SegmentError::empty_batch());
        }

        let mut documents = BTreeMap::new();
        for document in batch.added {
            // Later writes to the same id win within one batch
            documents.insert(document.id.clone(), document);
        }

        Ok(Segment::sealed(sequence, documents, batch.removed, Utc::now()))
    }

    fn merge(&mut self, inputs: &[Arc<Segment>]) -> SegmentResult<Segment> {
        if inputs.len() < 2 {
            return Err(SegmentError::merge_failed(
                "A merge needs at least two input segments",
            ));
        }

        // Apply inputs in sequence order so later segments shadow
        // earlier ones
        let mut ordered: Vec<&Arc<Segment>> = inputs.iter().collect();
        ordered.sort_by_key(|segment| segment.sequence);

        let mut documents: BTreeMap<String, _> = BTreeMap::new();
        let mut tombstones: BTreeSet<String> = BTreeSet::new();

        for segment in &ordered {
            for id in segment.tombstones() {
                documents.remove(id);
                tombstones.insert(id.clone());
            }
            for document in segment.documents() {
                tombstones.remove(&document.id);
                documents.insert(document.id.clone(), document.clone());
            }
        }

        let sequence = ordered
            .last()
            .map(|segment| segment.sequence)
            .expect("at least two inputs");
        let last_modified = inputs
            .iter()
            .map(|segment| segment.last_modified())
            .max()
            .expect("at least two inputs");

        Ok(Segment::sealed(sequence, documents, tombstones, last_modified))
    }

    fn dispose(&mut self, id: SegmentId) -> SegmentResult<()> {
        self.disposed.insert(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentEntry;
    use crate::segment::document::IndexDocument;

    fn doc(id: &str) -> IndexDocument {
        IndexDocument::from_entry(&ContentEntry::new(id, format!("/{}", id), "Document"))
    }

    fn batch_of(ids: &[&str]) -> MutationBatch {
        let mut batch = MutationBatch::new();
        for id in ids {
            batch.add(doc(id));
        }
        batch
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut store = MemorySegmentStore::new();
        let result = store.create(MutationBatch::new(), 1);

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code().code(), "QRY_EMPTY_BATCH");
    }

    #[test]
    fn test_merge_unions_disjoint_inputs() {
        let mut store = MemorySegmentStore::new();
        let a = Arc::new(store.create(batch_of(&["a1", "a2", "a3"]), 1).unwrap());
        let b = Arc::new(store.create(batch_of(&["b1", "b2"]), 2).unwrap());

        let merged = store.merge(&[a.clone(), b.clone()]).unwrap();

        assert_eq!(merged.doc_count(), 5);
        assert_eq!(merged.sequence, 2);
        assert!(merged.last_modified() >= a.last_modified());
        assert!(merged.last_modified() >= b.last_modified());
    }

    #[test]
    fn test_merge_higher_sequence_shadows() {
        let mut store = MemorySegmentStore::new();

        let mut old_doc = doc("shared");
        old_doc.primary_type = "Document".into();
        let mut old_batch = MutationBatch::new();
        old_batch.add(old_doc);

        let mut new_doc = doc("shared");
        new_doc.primary_type = "Image".into();
        let mut new_batch = MutationBatch::new();
        new_batch.add(new_doc);

        let old = Arc::new(store.create(old_batch, 1).unwrap());
        let new = Arc::new(store.create(new_batch, 2).unwrap());

        // Input order must not matter
        let merged = store.merge(&[new, old]).unwrap();

        assert_eq!(merged.doc_count(), 1);
        assert_eq!(merged.document("shared").unwrap().primary_type, "Image");
    }

    #[test]
    fn test_merge_applies_tombstones() {
        let mut store = MemorySegmentStore::new();
        let live = Arc::new(store.create(batch_of(&["keep", "drop"]), 1).unwrap());

        let mut removal = MutationBatch::new();
        removal.remove("drop");
        let tombstone = Arc::new(store.create(removal, 2).unwrap());

        let merged = store.merge(&[live, tombstone]).unwrap();

        assert_eq!(merged.doc_count(), 1);
        assert!(merged.document("keep").is_some());
        assert!(merged.document("drop").is_none());
        // The tombstone is retained to shadow older segments
        assert!(merged.tombstones().contains("drop"));
    }

    #[test]
    fn test_single_input_merge_rejected() {
        let mut store = MemorySegmentStore::new();
        let only = Arc::new(store.create(batch_of(&["a"]), 1).unwrap());

        let result = store.merge(&[only]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code().code(), "QRY_MERGE_FAILED");
    }

    #[test]
    fn test_dispose_tracked() {
        let mut store = MemorySegmentStore::new();
        let segment = store.create(batch_of(&["a"]), 1).unwrap();

        store.dispose(segment.id).unwrap();
        assert!(store.is_disposed(segment.id));
    }
}
