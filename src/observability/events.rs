//! Observable engine events
//!
//! Every event the engine can emit is listed here. Events are explicit
//! and typed; free-form event names are not accepted by the logger.

use std::fmt;

/// Observable events in the query/index engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Segment lifecycle
    /// An active segment was sealed and became queryable
    SegmentSealed,
    /// Merge policy selected a set of segments to merge
    MergeSelected,
    /// Merge policy declined an opportunistic merge inside the debounce window
    MergeSkippedDebounce,
    /// A merge completed and the merged segment was installed
    MergeComplete,
    /// A merge failed; the segment set is unchanged
    MergeFailed,
    /// Superseded segments were disposed
    SegmentsDisposed,

    // Query path
    /// A type name had no catalog entry; resolved to match-nothing
    TypeNotFound,
    /// An ordering operand could not be compiled; ties-equal fallback used
    SortFallback,
    /// A query finished executing
    QueryExecuted,

    // Invocation pipeline
    /// A request was skipped because it was already cancelled
    RequestCancelled,
    /// A request failed; the error was recorded on the request
    RequestFailed,
    /// A processor committed its buffered mutations
    ProcessorCommitted,
    /// A processor rolled back its buffered mutations
    ProcessorRolledBack,
}

impl Event {
    /// Returns the stable event name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            Event::SegmentSealed => "segment_sealed",
            Event::MergeSelected => "merge_selected",
            Event::MergeSkippedDebounce => "merge_skipped_debounce",
            Event::MergeComplete => "merge_complete",
            Event::MergeFailed => "merge_failed",
            Event::SegmentsDisposed => "segments_disposed",
            Event::TypeNotFound => "type_not_found",
            Event::SortFallback => "sort_fallback",
            Event::QueryExecuted => "query_executed",
            Event::RequestCancelled => "request_cancelled",
            Event::RequestFailed => "request_failed",
            Event::ProcessorCommitted => "processor_committed",
            Event::ProcessorRolledBack => "processor_rolled_back",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
