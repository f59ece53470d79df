//! Merge/aggregation policy
//!
//! Decides which sealed segments should be folded into one. Thresholds
//! select by candidate count and cumulative byte size; an opportunistic
//! request (both thresholds zero) is additionally debounced so bursts of
//! small writes do not trigger merge thrashing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::segment::{Segment, SegmentId};
use crate::observability::{Event, Logger, Severity};

/// Merge policy thresholds and debounce window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Minimum number of sealed segments before a merge is selected
    #[serde(default = "default_required_count")]
    pub required_count: u64,
    /// Minimum cumulative byte size before a merge is selected
    #[serde(default = "default_required_size")]
    pub required_size: u64,
    /// Minimum dwell time between opportunistic merge decisions
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_required_count() -> u64 {
    4
}

fn default_required_size() -> u64 {
    4 * 1024 * 1024
}

fn default_debounce_ms() -> u64 {
    1_000
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            required_count: default_required_count(),
            required_size: default_required_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Selects merge candidates from the sealed segment set.
///
/// The debounce timestamp is policy-owned state; callers must route all
/// decisions for one segment set through one policy value (`&mut self`
/// enforces a single writer), so two concurrent decisions cannot select
/// overlapping candidates.
#[derive(Debug)]
pub struct MergePolicy {
    config: MergeConfig,
    last_decision: Option<Instant>,
}

impl MergePolicy {
    /// Creates a policy with the given configuration
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            last_decision: None,
        }
    }

    /// Selects candidates using the configured thresholds.
    pub fn select(&mut self, segments: &[Arc<Segment>]) -> Vec<SegmentId> {
        let required_count = self.config.required_count;
        let required_size = self.config.required_size;
        self.select_with(segments, required_count, required_size)
    }

    /// Selects the segments to merge now, or an empty selection.
    ///
    /// Both thresholds zero means "merge whatever is pending": the
    /// debounce window is enforced and an empty selection returned while
    /// it has not elapsed. Otherwise the count and size thresholds must
    /// both be met. Any non-empty selection records the decision
    /// timestamp for the next debounce check.
    pub fn select_with(
        &mut self,
        segments: &[Arc<Segment>],
        required_count: u64,
        required_size: u64,
    ) -> Vec<SegmentId> {
        let opportunistic = required_count == 0 && required_size == 0;

        if opportunistic && !self.debounce_elapsed() {
            Logger::log(
                Severity::Trace,
                Event::MergeSkippedDebounce,
                &[("candidate_count", &segments.len().to_string())],
            );
            return Vec::new();
        }

        // A merge needs at least two inputs regardless of thresholds
        if segments.len() < 2 {
            return Vec::new();
        }

        if !opportunistic {
            let total_size: u64 = segments.iter().map(|s| s.size_bytes()).sum();
            if (segments.len() as u64) < required_count || total_size < required_size {
                return Vec::new();
            }
        }

        self.last_decision = Some(Instant::now());

        let selected: Vec<SegmentId> = segments.iter().map(|s| s.id).collect();
        Logger::log(
            Severity::Info,
            Event::MergeSelected,
            &[("selected_count", &selected.len().to_string())],
        );
        selected
    }

    fn debounce_elapsed(&self) -> bool {
        match self.last_decision {
            None => true,
            Some(at) => at.elapsed() >= Duration::from_millis(self.config.debounce_ms),
        }
    }
}
