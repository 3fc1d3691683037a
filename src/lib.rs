//! Hierarchical logging pipeline library

pub mod app;
pub mod config;
pub mod format;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod sink;

pub use config::schema::PipelineConfig;
pub use lifecycle::{build_registry, ShutdownGuard, StartupError};
pub use observability::PipelineLayer;
pub use pipeline::{Level, Logger, Record, Registry};
