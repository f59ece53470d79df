//! Segment manager
//!
//! Owns the current set of sealed segments. The set is copy-on-write:
//! every change installs a new `Arc`'d view, so snapshots handed to
//! readers stay stable for the lifetime of a query. Writers are expected
//! to hold `&mut SegmentManager` (single-writer discipline); readers
//! only need a snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use super::document::IndexDocument;
use super::errors::{SegmentError, SegmentResult};
use super::segment::{MutationBatch, Segment, SegmentId};
use super::store::SegmentStore;
use crate::observability::{Event, Logger, Severity};

/// A stable view of the sealed segment set.
///
/// Cheap to clone; holding a snapshot keeps its segments alive even
/// after they are merged away and disposed.
#[derive(Debug, Clone)]
pub struct SegmentSnapshot {
    segments: Arc<Vec<Arc<Segment>>>,
}

impl SegmentSnapshot {
    /// The segments in this view
    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    /// Returns true if the view holds no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Documents visible in this view, in id order.
    ///
    /// When several segments mention the same id, the highest sequence
    /// wins; a winning tombstone hides the document entirely.
    pub fn visible_documents(&self) -> Vec<&IndexDocument> {
        let mut by_sequence: Vec<&Arc<Segment>> = self.segments.iter().collect();
        by_sequence.sort_by(|a, b| b.sequence.cmp(&a.sequence));

        let mut seen: HashSet<&str> = HashSet::new();
        let mut visible: Vec<&IndexDocument> = Vec::new();

        for segment in by_sequence {
            for id in segment.tombstones() {
                seen.insert(id.as_str());
            }
            for document in segment.documents() {
                if seen.insert(document.id.as_str()) {
                    visible.push(document);
                }
            }
        }

        visible.sort_by(|a, b| a.id.cmp(&b.id));
        visible
    }

    /// Number of visible documents
    pub fn doc_count(&self) -> u64 {
        self.visible_documents().len() as u64
    }
}

/// Owns the sealed-segment set and its lifecycle transitions
#[derive(Debug, Default)]
pub struct SegmentManager {
    view: Arc<Vec<Arc<Segment>>>,
    /// Merged-away segments pending disposal
    retired: Vec<Arc<Segment>>,
    next_sequence: u64,
}

impl SegmentManager {
    /// Creates a manager with no segments
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a stable snapshot of the current sealed set
    pub fn snapshot(&self) -> SegmentSnapshot {
        SegmentSnapshot {
            segments: Arc::clone(&self.view),
        }
    }

    /// The current sealed segments
    pub fn sealed_segments(&self) -> &[Arc<Segment>] {
        &self.view
    }

    /// Number of segments pending disposal
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Seals a mutation batch into a new segment and installs it.
    pub fn seal<S: SegmentStore>(
        &mut self,
        store: &mut S,
        batch: MutationBatch,
    ) -> SegmentResult<SegmentId> {
        self.next_sequence += 1;
        let segment = Arc::new(store.create(batch, self.next_sequence)?);
        let segment_id = segment.id;

        let mut view: Vec<Arc<Segment>> = self.view.as_ref().clone();
        view.push(Arc::clone(&segment));
        self.view = Arc::new(view);

        Logger::log(
            Severity::Info,
            Event::SegmentSealed,
            &[
                ("segment_id", &segment_id.to_string()),
                ("doc_count", &segment.doc_count().to_string()),
            ],
        );

        Ok(segment_id)
    }

    /// Merges the given segments into one replacement segment.
    ///
    /// On success the inputs leave the view and move to the retired
    /// list; on failure the view is unchanged and the error propagates.
    pub fn merge<S: SegmentStore>(
        &mut self,
        store: &mut S,
        ids: &[SegmentId],
    ) -> SegmentResult<SegmentId> {
        let mut inputs = Vec::with_capacity(ids.len());
        for id in ids {
            let segment = self
                .view
                .iter()
                .find(|segment| segment.id == *id)
                .ok_or(SegmentError::segment_not_found(*id))?;
            inputs.push(Arc::clone(segment));
        }

        let merged = match store.merge(&inputs) {
            Ok(segment) => Arc::new(segment),
            Err(e) => {
                Logger::log_stderr(
                    Severity::Error,
                    Event::MergeFailed,
                    &[("reason", e.message())],
                );
                return Err(e);
            }
        };
        let merged_id = merged.id;

        let replaced: HashSet<SegmentId> = ids.iter().copied().collect();
        let mut view: Vec<Arc<Segment>> = self
            .view
            .iter()
            .filter(|segment| !replaced.contains(&segment.id))
            .cloned()
            .collect();
        view.push(Arc::clone(&merged));
        self.view = Arc::new(view);

        self.retired.extend(inputs);

        Logger::log(
            Severity::Info,
            Event::MergeComplete,
            &[
                ("doc_count", &merged.doc_count().to_string()),
                ("input_count", &ids.len().to_string()),
                ("merged_id", &merged_id.to_string()),
            ],
        );

        Ok(merged_id)
    }

    /// Disposes all retired segments.
    ///
    /// Callers invoke this once in-flight readers can no longer hold
    /// snapshots that reference the retired segments.
    pub fn dispose_retired<S: SegmentStore>(&mut self, store: &mut S) -> SegmentResult<usize> {
        let retired = std::mem::take(&mut self.retired);
        let count = retired.len();

        for segment in retired {
            store.dispose(segment.id)?;
        }

        if count > 0 {
            Logger::log(
                Severity::Info,
                Event::SegmentsDisposed,
                &[("count", &count.to_string())],
            );
        }

        Ok(count)
    }
}
