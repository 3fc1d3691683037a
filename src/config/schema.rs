//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the pipeline.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::format::{DEFAULT_DATEFMT, DEFAULT_PATTERN};
use crate::pipeline::filter::{AllowHierarchy, ExcludePrefix, Filter, MaxLevel};
use crate::pipeline::level::Level;
use crate::sink::ConsoleStream;

/// Root configuration for the logging pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root logger: default level and the sinks every logger propagates to.
    pub root: RootConfig,

    /// Formatter shared by all sinks without their own `format`.
    pub format: FormatConfig,

    /// Named filter definitions, referenced from sinks and loggers.
    pub filters: BTreeMap<String, FilterConfig>,

    /// Named sink definitions.
    pub sinks: BTreeMap<String, SinkConfig>,

    /// Per-logger overrides, keyed by dotted logger name.
    pub loggers: BTreeMap<String, LoggerConfig>,
}

impl Default for PipelineConfig {
    /// Rotating `app.log` (1 MiB × 3) plus stdout on the root at INFO, with
    /// `auth` records kept out of the file.
    fn default() -> Self {
        let filters = BTreeMap::from([(
            "exclude_auth".to_string(),
            FilterConfig::ExcludePrefix {
                prefix: "auth".to_string(),
            },
        )]);

        let mut file = SinkConfig::rotating_file("app.log", 1024 * 1024, 3);
        file.filters.push("exclude_auth".to_string());
        let sinks = BTreeMap::from([
            ("file".to_string(), file),
            ("console".to_string(), SinkConfig::console(ConsoleStream::Stdout)),
        ]);

        let loggers = BTreeMap::from([
            ("auth".to_string(), LoggerConfig::with_level(Level::Warning)),
            ("database".to_string(), LoggerConfig::with_level(Level::Info)),
            ("utils".to_string(), LoggerConfig::with_level(Level::Debug)),
        ]);

        Self {
            root: RootConfig {
                level: Level::Info,
                sinks: vec!["file".to_string(), "console".to_string()],
                filters: Vec::new(),
            },
            format: FormatConfig::default(),
            filters,
            sinks,
            loggers,
        }
    }
}

/// Root logger configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RootConfig {
    /// Process-wide default level for loggers without an explicit level.
    pub level: Level,

    /// Sinks attached to the root, in invocation order.
    pub sinks: Vec<String>,

    /// Filters applied to records logged directly on the root.
    pub filters: Vec<String>,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            level: Level::Warning,
            sinks: Vec::new(),
            filters: Vec::new(),
        }
    }
}

/// Record layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Template with `{asctime}`, `{created}`, `{name}`, `{levelname}`,
    /// `{levelno}` and `{message}` placeholders.
    pub pattern: String,

    /// `strftime` format for `{asctime}`.
    pub datefmt: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            datefmt: DEFAULT_DATEFMT.to_string(),
        }
    }
}

/// A named record filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Reject records whose logger name starts with `prefix`.
    ExcludePrefix { prefix: String },

    /// Keep only records from `name` and its descendants.
    AllowHierarchy { name: String },

    /// Keep records at or below `level`.
    MaxLevel { level: Level },
}

impl FilterConfig {
    pub fn build(&self) -> Arc<dyn Filter> {
        match self {
            FilterConfig::ExcludePrefix { prefix } => Arc::new(ExcludePrefix::new(prefix.clone())),
            FilterConfig::AllowHierarchy { name } => Arc::new(AllowHierarchy::new(name.clone())),
            FilterConfig::MaxLevel { level } => Arc::new(MaxLevel::new(*level)),
        }
    }
}

/// Sink variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Console,
    RotatingFile,
}

/// Sink configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SinkConfig {
    /// `console` or `rotating_file`.
    pub kind: SinkKind,

    /// Console stream (`stdout` or `stderr`). Console sinks only.
    pub stream: ConsoleStream,

    /// Log file path. Required for rotating file sinks.
    pub path: Option<PathBuf>,

    /// Rotate once the file would exceed this many bytes (0 = never).
    pub max_bytes: u64,

    /// Number of backups kept (`path.1` … `path.N`; 0 = never rotate).
    pub backup_count: u32,

    /// Minimum level this sink writes.
    pub level: Option<Level>,

    /// Filters applied by this sink, in order.
    pub filters: Vec<String>,

    /// Per-sink layout; falls back to the top-level `format`.
    pub format: Option<FormatConfig>,
}

impl SinkConfig {
    pub fn console(stream: ConsoleStream) -> Self {
        Self {
            kind: SinkKind::Console,
            stream,
            ..Self::default()
        }
    }

    pub fn rotating_file(path: impl Into<PathBuf>, max_bytes: u64, backup_count: u32) -> Self {
        Self {
            kind: SinkKind::RotatingFile,
            path: Some(path.into()),
            max_bytes,
            backup_count,
            ..Self::default()
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::Console,
            stream: ConsoleStream::Stdout,
            path: None,
            max_bytes: 0,
            backup_count: 0,
            level: None,
            filters: Vec::new(),
            format: None,
        }
    }
}

/// Per-logger configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Explicit level; inherited from the nearest ancestor when absent.
    pub level: Option<Level>,

    /// Sinks attached directly to this logger.
    pub sinks: Vec<String>,

    /// Filters applied to records logged on this logger.
    pub filters: Vec<String>,

    /// Whether records also reach ancestor sinks.
    pub propagate: bool,
}

impl LoggerConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: None,
            sinks: Vec::new(),
            filters: Vec::new(),
            propagate: true,
        }
    }
}
