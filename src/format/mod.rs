//! Record formatting.
//!
//! # Data Flow
//! ```text
//! FormatConfig { pattern, datefmt }
//!     → Formatter::new (compile template, validate date format)
//!     → shared by every handler without an override
//!
//! Record → Formatter::render → text line → Sink::write
//! ```
//!
//! # Design Decisions
//! - Templates are compiled once; rendering is infallible
//! - No escaping: message text is emitted as-is

pub mod formatter;

pub use formatter::{FormatError, Formatter, DEFAULT_DATEFMT, DEFAULT_PATTERN};
