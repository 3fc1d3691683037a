//! Log record.

use chrono::{DateTime, Local};

use crate::pipeline::level::Level;

/// Rendered chain of an error attached to a record.
///
/// The first entry is the error itself, followed by each `source()` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    chain: Vec<String>,
}

impl ErrorInfo {
    /// Capture the message of `error` and of every error in its source chain.
    pub fn capture(error: &(dyn std::error::Error + 'static)) -> Self {
        let chain = std::iter::successors(Some(error), |e| e.source())
            .map(|e| e.to_string())
            .collect();
        Self { chain }
    }

    pub fn chain(&self) -> &[String] {
        &self.chain
    }
}

/// A single log event. Immutable once created.
#[derive(Debug, Clone)]
pub struct Record {
    logger: String,
    level: Level,
    message: String,
    timestamp: DateTime<Local>,
    error: Option<ErrorInfo>,
}

impl Record {
    /// Create a record stamped with the current local time.
    pub fn new(logger: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            level,
            message: message.into(),
            timestamp: Local::now(),
            error: None,
        }
    }

    /// Replace the timestamp. Used for replaying events and in tests.
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach the error chain of `error`.
    pub fn with_error(mut self, error: &(dyn std::error::Error + 'static)) -> Self {
        self.error = Some(ErrorInfo::capture(error));
        self
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }
}
