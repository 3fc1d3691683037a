//! Output sinks.
//!
//! # Data Flow
//! ```text
//! Record (accepted by its logger)
//!     → handler.rs (level threshold, handler filters, render)
//!     → Sink::write (console.rs | rotating.rs | memory.rs)
//! ```
//!
//! # Design Decisions
//! - Sinks only see rendered text; gating and formatting live in the handler
//! - Every stateful sink serializes writes behind its own mutex
//! - I/O errors are returned, never swallowed here; the dispatcher decides

use std::fmt;
use std::io;

use thiserror::Error;

pub mod console;
pub mod handler;
pub mod memory;
pub mod rotating;

pub use console::{ConsoleSink, ConsoleStream};
pub use handler::Handler;
pub use memory::MemorySink;
pub use rotating::RotatingFileSink;

/// Destination for rendered log lines.
pub trait Sink: Send + Sync + fmt::Debug {
    /// Write one rendered record. The sink adds the line terminator.
    fn write(&self, line: &str) -> io::Result<()>;

    /// Flush buffered output, if any.
    fn flush(&self) -> io::Result<()>;
}

/// A sink failed to accept a record.
#[derive(Debug, Error)]
#[error("sink `{sink}` failed: {source}")]
pub struct SinkError {
    pub sink: String,
    #[source]
    pub source: io::Error,
}
