//! Record routing and filtering pipeline.
//!
//! # Data Flow
//! ```text
//! Logger::log(level, message)
//!     → registry.rs (effective level: explicit → nearest ancestor → root)
//!     → level < effective? drop, no record built
//!     → record.rs (immutable Record stamped with local time)
//!     → dispatch.rs
//!         → filter.rs (originating logger's chain, AND, short-circuit)
//!         → handlers: own, then ancestors while propagating, then root
//!         → Handler::handle (threshold, handler filters, render, write)
//! ```
//!
//! # Design Decisions
//! - Synchronous: every sink write completes before `log` returns
//! - Registry is an explicit object, so tests get a fresh one each
//! - Attachment lists are copy-on-write; dispatch never waits on configuration

pub mod dispatch;
pub mod filter;
pub mod level;
pub mod record;
pub mod registry;

pub use filter::{AllowHierarchy, ExcludePrefix, Filter, FilterChain, FnFilter, MaxLevel};
pub use level::{Level, ParseLevelError};
pub use record::{ErrorInfo, Record};
pub use registry::{Logger, Registry, ROOT_LOGGER, SEPARATOR};
