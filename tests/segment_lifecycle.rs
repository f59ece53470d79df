//! Segment Lifecycle Tests
//!
//! Tests for segment invariants:
//! - Merge preserves the union of input document sets
//! - The merge policy debounces opportunistic merges
//! - Snapshots stay stable while the set changes underneath
//! - Disposal is a separate, explicit step

use std::sync::Arc;
use std::time::Duration;

use quarry::content::ContentEntry;
use quarry::segment::{
    IndexDocument, MemorySegmentStore, MergeConfig, MergePolicy, MutationBatch, SegmentId,
    SegmentManager,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn batch_of(prefix: &str, count: usize) -> MutationBatch {
    let mut batch = MutationBatch::new();
    for i in 0..count {
        let id = format!("{}_{}", prefix, i);
        batch.add(IndexDocument::from_entry(&ContentEntry::new(
            &id,
            format!("/content/{}", id),
            "Document",
        )));
    }
    batch
}

/// Manager with three sealed segments of 5, 3, and 2 documents.
fn seeded() -> (MemorySegmentStore, SegmentManager) {
    let mut store = MemorySegmentStore::new();
    let mut manager = SegmentManager::new();
    manager.seal(&mut store, batch_of("a", 5)).unwrap();
    manager.seal(&mut store, batch_of("b", 3)).unwrap();
    manager.seal(&mut store, batch_of("c", 2)).unwrap();
    (store, manager)
}

fn segment_ids(manager: &SegmentManager) -> Vec<SegmentId> {
    manager.sealed_segments().iter().map(|s| s.id).collect()
}

// =============================================================================
// Merge Policy Tests
// =============================================================================

/// Two opportunistic calls inside the debounce window: the second
/// returns an empty selection; after the window it selects again.
#[test]
fn test_opportunistic_merge_debounced() {
    let (_store, manager) = seeded();
    let mut policy = MergePolicy::new(MergeConfig {
        debounce_ms: 50,
        ..MergeConfig::default()
    });

    let first = policy.select_with(manager.sealed_segments(), 0, 0);
    assert_eq!(first.len(), 3);

    let second = policy.select_with(manager.sealed_segments(), 0, 0);
    assert!(second.is_empty());

    std::thread::sleep(Duration::from_millis(80));

    let third = policy.select_with(manager.sealed_segments(), 0, 0);
    assert_eq!(third.len(), 3);
}

/// A count threshold of 2 selects the three candidates; their document
/// counts sum past the threshold.
#[test]
fn test_count_threshold_selection() {
    let (_store, manager) = seeded();
    let mut policy = MergePolicy::new(MergeConfig::default());

    let selected = policy.select_with(manager.sealed_segments(), 2, 0);
    assert!(selected.len() >= 2);

    let selected_docs: u64 = manager
        .sealed_segments()
        .iter()
        .filter(|s| selected.contains(&s.id))
        .map(|s| s.doc_count())
        .sum();
    assert!(selected_docs >= 2);
}

/// Unmet thresholds yield an empty selection.
#[test]
fn test_unmet_thresholds_select_nothing() {
    let (_store, manager) = seeded();
    let mut policy = MergePolicy::new(MergeConfig::default());

    assert!(policy
        .select_with(manager.sealed_segments(), 10, 0)
        .is_empty());
    assert!(policy
        .select_with(manager.sealed_segments(), 0, u64::MAX)
        .is_empty());
}

// =============================================================================
// Merge Execution Tests
// =============================================================================

/// Segments of {5, 3, 2} documents merge into exactly one segment of 10
/// with no trace of the originals.
#[test]
fn test_merge_unions_document_sets() {
    let (mut store, mut manager) = seeded();
    let original_ids = segment_ids(&manager);

    let mut policy = MergePolicy::new(MergeConfig::default());
    let selected = policy.select_with(manager.sealed_segments(), 2, 0);
    let merged_id = manager.merge(&mut store, &selected).unwrap();

    assert_eq!(manager.sealed_segments().len(), 1);
    let merged = &manager.sealed_segments()[0];
    assert_eq!(merged.id, merged_id);
    assert_eq!(merged.doc_count(), 10);

    for id in &original_ids {
        assert!(!manager.sealed_segments().iter().any(|s| s.id == *id));
    }
}

/// The merged segment's last-modified time is no earlier than any input.
#[test]
fn test_merge_advances_last_modified() {
    let (mut store, mut manager) = seeded();
    let latest_input = manager
        .sealed_segments()
        .iter()
        .map(|s| s.last_modified())
        .max()
        .unwrap();

    let ids = segment_ids(&manager);
    manager.merge(&mut store, &ids).unwrap();

    assert!(manager.sealed_segments()[0].last_modified() >= latest_input);
}

/// A reader's snapshot is unaffected by a concurrent merge and the
/// disposal of its inputs.
#[test]
fn test_snapshot_survives_merge_and_disposal() {
    let (mut store, mut manager) = seeded();

    let reader_view = manager.snapshot();
    assert_eq!(reader_view.segments().len(), 3);
    assert_eq!(reader_view.doc_count(), 10);

    let ids = segment_ids(&manager);
    manager.merge(&mut store, &ids).unwrap();
    manager.dispose_retired(&mut store).unwrap();

    // The old view still reads all three original segments
    assert_eq!(reader_view.segments().len(), 3);
    assert_eq!(reader_view.doc_count(), 10);

    // A fresh view sees only the merged segment
    assert_eq!(manager.snapshot().segments().len(), 1);
}

/// Retired segments are only released by the explicit disposal step.
#[test]
fn test_disposal_is_explicit() {
    let (mut store, mut manager) = seeded();
    let ids = segment_ids(&manager);

    manager.merge(&mut store, &ids).unwrap();
    assert_eq!(manager.retired_count(), 3);
    assert_eq!(store.disposed_count(), 0);

    let disposed = manager.dispose_retired(&mut store).unwrap();
    assert_eq!(disposed, 3);
    assert_eq!(store.disposed_count(), 3);
    for id in ids {
        assert!(store.is_disposed(id));
    }
}

/// A failed merge leaves the segment set unchanged.
#[test]
fn test_failed_merge_leaves_set_unchanged() {
    let (mut store, mut manager) = seeded();
    let before = segment_ids(&manager);

    // A single-input merge is rejected by the store
    let result = manager.merge(&mut store, &before[..1]);
    assert!(result.is_err());

    assert_eq!(segment_ids(&manager), before);
    assert_eq!(manager.retired_count(), 0);
}

// =============================================================================
// Mutation Visibility Tests
// =============================================================================

/// An update in a later segment shadows the earlier document, and a
/// merge collapses the pair without resurrecting the old version.
#[test]
fn test_update_survives_merge() {
    let mut store = MemorySegmentStore::new();
    let mut manager = SegmentManager::new();

    let mut original = MutationBatch::new();
    let mut entry = ContentEntry::new("doc", "/content/doc", "Document");
    original.add(IndexDocument::from_entry(&entry));
    manager.seal(&mut store, original).unwrap();

    entry.primary_type = "Image".into();
    let mut update = MutationBatch::new();
    update.add(IndexDocument::from_entry(&entry));
    manager.seal(&mut store, update).unwrap();

    let ids = segment_ids(&manager);
    manager.merge(&mut store, &ids).unwrap();

    let snapshot = manager.snapshot();
    let visible = snapshot.visible_documents();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].primary_type, "Image");
}

/// A removal in a later segment hides the document before and after a
/// merge.
#[test]
fn test_removal_survives_merge() {
    let mut store = MemorySegmentStore::new();
    let mut manager = SegmentManager::new();

    manager.seal(&mut store, batch_of("keep", 2)).unwrap();

    let mut removal = MutationBatch::new();
    removal.remove("keep_0");
    manager.seal(&mut store, removal).unwrap();

    assert_eq!(manager.snapshot().doc_count(), 1);

    let ids = segment_ids(&manager);
    manager.merge(&mut store, &ids).unwrap();

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.doc_count(), 1);
    let visible = snapshot.visible_documents();
    assert_eq!(visible[0].id, "keep_1");
}

/// Merging twice in a row keeps folding the set down to one segment.
#[test]
fn test_repeated_merge_cycles() {
    let mut store = MemorySegmentStore::new();
    let mut manager = SegmentManager::new();
    let mut policy = MergePolicy::new(MergeConfig::default());

    for round in 0..4 {
        manager
            .seal(&mut store, batch_of(&format!("r{}", round), 2))
            .unwrap();

        let selected = policy.select_with(manager.sealed_segments(), 2, 0);
        if selected.len() >= 2 {
            manager.merge(&mut store, &selected).unwrap();
            manager.dispose_retired(&mut store).unwrap();
        }
    }

    assert_eq!(manager.sealed_segments().len(), 1);
    assert_eq!(manager.snapshot().doc_count(), 8);
}

/// Segment handles stay valid for readers holding them via Arc even
/// after the manager has moved on.
#[test]
fn test_arc_segments_outlive_view() {
    let (mut store, mut manager) = seeded();

    let held: Vec<Arc<_>> = manager.sealed_segments().to_vec();
    let ids = segment_ids(&manager);
    manager.merge(&mut store, &ids).unwrap();
    manager.dispose_retired(&mut store).unwrap();

    let total: u64 = held.iter().map(|s| s.doc_count()).sum();
    assert_eq!(total, 10);
}
