//! Request processing
//!
//! `RequestProcessor` drives a batch of requests through an executor
//! seam. Failures land on the individual request so independent
//! siblings still run; closing the processor commits unless a rollback
//! was marked.

use std::mem;

use crate::content::ContentSource;
use crate::observability::{Event, Logger, Severity};
use crate::segment::{IndexDocument, MutationBatch, SegmentManager, SegmentStore};

use super::command::{Command, CommandOutcome};
use super::context::InvocationContext;
use super::errors::{InvocationError, InvocationResult};
use super::request::Request;

/// Executes commands and defines the commit/rollback hooks
pub trait CommandExecutor {
    /// Executes one command.
    ///
    /// Kinds the executor does not handle return an unsupported-request
    /// error; the processor records it on the request.
    fn execute(
        &mut self,
        ctx: &InvocationContext<'_>,
        command: &Command,
    ) -> InvocationResult<CommandOutcome>;

    /// Makes all buffered work effective
    fn commit(&mut self) -> InvocationResult<()>;

    /// Discards all buffered work
    fn rollback(&mut self) -> InvocationResult<()>;
}

/// Batch-level driver applying commit/rollback to a set of commands
pub struct RequestProcessor<E: CommandExecutor> {
    executor: E,
    rollback_marked: bool,
}

impl<E: CommandExecutor> RequestProcessor<E> {
    /// Creates a processor over the given executor
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            rollback_marked: false,
        }
    }

    /// Processes one request.
    ///
    /// A cancelled request is a no-op. Any failure is recorded on the
    /// request and does not propagate.
    pub fn process(&mut self, ctx: &InvocationContext<'_>, request: &mut Request) {
        if request.is_cancelled() {
            Logger::log(
                Severity::Trace,
                Event::RequestCancelled,
                &[("request_id", &request.id().to_string())],
            );
            return;
        }

        match self.executor.execute(ctx, request.command()) {
            Ok(outcome) => request.set_outcome(outcome),
            Err(error) => {
                Logger::log(
                    Severity::Warn,
                    Event::RequestFailed,
                    &[
                        ("command", request.command().name()),
                        ("error", &error.to_string()),
                        ("request_id", &request.id().to_string()),
                    ],
                );
                request.set_error(error);
            }
        }
    }

    /// Marks the batch for rollback; close will discard instead of
    /// committing.
    pub fn mark_for_rollback(&mut self) {
        self.rollback_marked = true;
    }

    /// Returns true if a rollback was marked
    pub fn is_marked_for_rollback(&self) -> bool {
        self.rollback_marked
    }

    /// Closes the processor: commits if no rollback was marked,
    /// otherwise rolls back.
    pub fn close(mut self) -> InvocationResult<()> {
        if self.rollback_marked {
            self.executor.rollback()?;
            Logger::log(Severity::Info, Event::ProcessorRolledBack, &[]);
        } else {
            self.executor.commit()?;
            Logger::log(Severity::Info, Event::ProcessorCommitted, &[]);
        }
        Ok(())
    }
}

/// Command executor that buffers index mutations and seals them into a
/// segment on commit.
pub struct IndexCommandExecutor<'a, S: SegmentStore, Src: ContentSource> {
    store: &'a mut S,
    manager: &'a mut SegmentManager,
    source: &'a Src,
    buffer: MutationBatch,
}

impl<'a, S: SegmentStore, Src: ContentSource> IndexCommandExecutor<'a, S, Src> {
    /// Creates an executor over the given store, manager, and source
    pub fn new(store: &'a mut S, manager: &'a mut SegmentManager, source: &'a Src) -> Self {
        Self {
            store,
            manager,
            source,
            buffer: MutationBatch::new(),
        }
    }

    /// Number of buffered, uncommitted mutations
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn validate_entry(
        ctx: &InvocationContext<'_>,
        entry: &crate::content::ContentEntry,
    ) -> InvocationResult<()> {
        let Some(segments) = ctx.path_splitter().split(&entry.path) else {
            return Err(InvocationError::invalid_entry(
                &entry.id,
                format!("path '{}' is not absolute", entry.path),
            ));
        };

        let Some(name) = segments.last() else {
            return Err(InvocationError::invalid_entry(
                &entry.id,
                "the root path cannot be indexed",
            ));
        };

        if !ctx.name_converter().is_valid(name) {
            return Err(InvocationError::invalid_entry(
                &entry.id,
                format!("node name '{}' is malformed", name),
            ));
        }

        Ok(())
    }
}

impl<'a, S: SegmentStore, Src: ContentSource> CommandExecutor for IndexCommandExecutor<'a, S, Src> {
    fn execute(
        &mut self,
        ctx: &InvocationContext<'_>,
        command: &Command,
    ) -> InvocationResult<CommandOutcome> {
        match command {
            Command::ApplyChanges(changes) => {
                for entry in &changes.added {
                    Self::validate_entry(ctx, entry)?;
                }

                for entry in &changes.added {
                    self.buffer.add(IndexDocument::from_entry(entry));
                }
                for id in &changes.removed {
                    self.buffer.remove(id.clone());
                }

                Ok(CommandOutcome::Applied {
                    added: changes.added.len(),
                    removed: changes.removed.len(),
                })
            }
            Command::FetchEntry { id } => self
                .source
                .entry(id)
                .map(CommandOutcome::Entry)
                .ok_or_else(|| InvocationError::EntryNotFound(id.clone())),
            Command::FetchChildren { parent_id } => {
                Ok(CommandOutcome::Children(self.source.children(parent_id)))
            }
        }
    }

    fn commit(&mut self) -> InvocationResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch = mem::take(&mut self.buffer);
        self.manager.seal(self.store, batch)?;
        Ok(())
    }

    fn rollback(&mut self) -> InvocationResult<()> {
        self.buffer = MutationBatch::new();
        Ok(())
    }
}
