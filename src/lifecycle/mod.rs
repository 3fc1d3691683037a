//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build filters → Open sinks → Configure loggers
//!
//! Shutdown (shutdown.rs):
//!     Guard dropped or shut down → Flush every sink once
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then sinks, then loggers
//! - Startup errors are fatal; runtime sink errors are not

pub mod shutdown;
pub mod startup;

pub use shutdown::ShutdownGuard;
pub use startup::{build_from_file, build_registry, StartupError};
