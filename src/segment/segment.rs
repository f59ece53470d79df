//! Sealed segments and mutation batches

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::IndexDocument;

/// Segment identifier
pub type SegmentId = Uuid;

/// An accumulating set of index mutations (the `active` stage of the
/// segment lifecycle). Sealing a batch produces an immutable segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationBatch {
    /// Documents added or replaced
    pub added: Vec<IndexDocument>,
    /// Document ids removed
    pub removed: BTreeSet<String>,
}

impl MutationBatch {
    /// Creates an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an added or replaced document
    pub fn add(&mut self, document: IndexDocument) {
        // A re-add supersedes a pending removal of the same id
        self.removed.remove(&document.id);
        self.added.push(document);
    }

    /// Records a removal
    pub fn remove(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.added.retain(|doc| doc.id != id);
        self.removed.insert(id);
    }

    /// Returns true if the batch holds no mutations
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Returns the number of mutations in the batch
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// An immutable, independently queryable unit of indexed documents.
///
/// Segments carry a sequence number assigned at seal time; when two
/// segments mention the same document id, the higher sequence wins.
/// Tombstones shadow documents in lower-sequence segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment identifier
    pub id: SegmentId,
    /// Seal-order sequence; merged segments take the max of their inputs
    pub sequence: u64,
    /// Live documents keyed by id
    documents: BTreeMap<String, IndexDocument>,
    /// Ids removed as of this segment
    tombstones: BTreeSet<String>,
    /// Approximate byte size of the indexed data
    size_bytes: u64,
    /// Latest modification this segment reflects
    last_modified: DateTime<Utc>,
}

impl Segment {
    /// Builds a sealed segment. Size is estimated from the serialized
    /// document forms.
    pub fn sealed(
        sequence: u64,
        documents: BTreeMap<String, IndexDocument>,
        tombstones: BTreeSet<String>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        let size_bytes = documents
            .values()
            .map(|doc| {
                serde_json::to_string(doc)
                    .map(|s| s.len() as u64)
                    .unwrap_or(0)
            })
            .sum();

        Self {
            id: Uuid::new_v4(),
            sequence,
            documents,
            tombstones,
            size_bytes,
            last_modified,
        }
    }

    /// Number of live documents
    pub fn doc_count(&self) -> u64 {
        self.documents.len() as u64
    }

    /// Approximate byte size
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Latest modification this segment reflects
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Live documents, in id order
    pub fn documents(&self) -> impl Iterator<Item = &IndexDocument> {
        self.documents.values()
    }

    /// Returns the live document with the given id
    pub fn document(&self, id: &str) -> Option<&IndexDocument> {
        self.documents.get(id)
    }

    /// Returns true if this segment mentions the id at all (live or
    /// tombstoned); used for sequence-based shadowing
    pub fn mentions(&self, id: &str) -> bool {
        self.documents.contains_key(id) || self.tombstones.contains(id)
    }

    /// Tombstoned ids
    pub fn tombstones(&self) -> &BTreeSet<String> {
        &self.tombstones
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentEntry;

    fn doc(id: &str) -> IndexDocument {
        IndexDocument::from_entry(&ContentEntry::new(id, format!("/{}", id), "Document"))
    }

    #[test]
    fn test_batch_add_supersedes_removal() {
        let mut batch = MutationBatch::new();
        batch.remove("e1");
        batch.add(doc("e1"));

        assert_eq!(batch.added.len(), 1);
        assert!(batch.removed.is_empty());
    }

    #[test]
    fn test_batch_removal_supersedes_add() {
        let mut batch = MutationBatch::new();
        batch.add(doc("e1"));
        batch.add(doc("e2"));
        batch.remove("e1");

        assert_eq!(batch.added.len(), 1);
        assert_eq!(batch.added[0].id, "e2");
        assert!(batch.removed.contains("e1"));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_sealed_segment_counts() {
        let mut documents = BTreeMap::new();
        for id in ["a", "b", "c"] {
            documents.insert(id.to_string(), doc(id));
        }

        let segment = Segment::sealed(1, documents, BTreeSet::new(), Utc::now());

        assert_eq!(segment.doc_count(), 3);
        assert!(segment.size_bytes() > 0);
        assert!(segment.mentions("a"));
        assert!(!segment.mentions("z"));
    }

    #[test]
    fn test_tombstones_are_mentions() {
        let mut tombstones = BTreeSet::new();
        tombstones.insert("gone".to_string());

        let segment = Segment::sealed(2, BTreeMap::new(), tombstones, Utc::now());

        assert_eq!(segment.doc_count(), 0);
        assert!(segment.mentions("gone"));
        assert!(segment.document("gone").is_none());
    }
}
