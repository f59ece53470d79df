//! Requests
//!
//! A request wraps one command with a cancellation flag and an error
//! slot. Cancellation may be flipped from another thread; the processor
//! checks it once at processing entry.

use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use super::command::{Command, CommandOutcome};
use super::errors::InvocationError;

/// One command queued for processing
#[derive(Debug)]
pub struct Request {
    id: Uuid,
    command: Command,
    cancelled: AtomicBool,
    error: Option<InvocationError>,
    outcome: Option<CommandOutcome>,
}

impl Request {
    /// Creates a request for the given command
    pub fn new(command: Command) -> Self {
        Self {
            id: Uuid::new_v4(),
            command,
            cancelled: AtomicBool::new(false),
            error: None,
            outcome: None,
        }
    }

    /// Request id for log correlation
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The wrapped command
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Flags the request as cancelled.
    ///
    /// Takes effect if processing has not started; a request mid-flight
    /// runs to completion.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true if the request was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Records a processing failure on this request
    pub(crate) fn set_error(&mut self, error: InvocationError) {
        self.error = Some(error);
    }

    /// Records the command's outcome
    pub(crate) fn set_outcome(&mut self, outcome: CommandOutcome) {
        self.outcome = Some(outcome);
    }

    /// Returns true if processing recorded an error
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The recorded error, if any
    pub fn error(&self) -> Option<&InvocationError> {
        self.error.as_ref()
    }

    /// The command's outcome, if it was processed successfully
    pub fn outcome(&self) -> Option<&CommandOutcome> {
        self.outcome.as_ref()
    }
}
