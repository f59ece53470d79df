//! Invocation pipeline subsystem for quarry
//!
//! Content mutations and reads flow through here as commands: small,
//! immutable values dispatched through an executor seam, batched by a
//! request processor with explicit commit/rollback.
//!
//! # Design Principles
//!
//! - Commands carry data, never execution logic
//! - A failed request never aborts its siblings: errors are recorded on
//!   the request object
//! - Cancellation is cooperative, checked at processing entry
//! - Closing a processor commits unless a rollback was marked

mod command;
mod context;
mod errors;
mod processor;
mod request;

pub use command::{ApplyChanges, Command, CommandOutcome};
pub use context::{InvocationContext, NameConverter, PathSplitter};
pub use errors::{InvocationError, InvocationResult};
pub use processor::{CommandExecutor, IndexCommandExecutor, RequestProcessor};
pub use request::Request;
