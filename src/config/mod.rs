//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PipelineConfig (validated, immutable)
//!     → lifecycle::startup builds the Registry from it, once
//! ```
//!
//! # Design Decisions
//! - Config is applied once at startup; there is no runtime reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::FilterConfig;
pub use schema::FormatConfig;
pub use schema::LoggerConfig;
pub use schema::PipelineConfig;
pub use schema::RootConfig;
pub use schema::SinkConfig;
pub use schema::SinkKind;
