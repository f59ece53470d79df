//! Observability subsystem for quarry
//!
//! Structured, synchronous logging of engine events.
//!
//! # Design Principles
//!
//! - Structured logs (JSON), one line per event
//! - Deterministic key ordering
//! - Explicit severity levels
//! - No buffering: a logged event is already written

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
