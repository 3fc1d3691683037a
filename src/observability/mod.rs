//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline internals produce:
//!     → metrics.rs (counters: written, filtered, rotations, sink errors)
//!     → tracing events under this crate's target (startup, rotation, failures)
//!
//! Other code using `tracing`:
//!     → layer.rs (PipelineLayer) → Registry::get_logger(target) → pipeline
//! ```
//!
//! # Design Decisions
//! - Metrics go through the `metrics` facade; no exporter is bundled
//! - The crate's own diagnostics never re-enter the pipeline

pub mod layer;
pub mod metrics;

pub use layer::PipelineLayer;
