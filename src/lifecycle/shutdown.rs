//! Flush-on-exit handling.
//!
//! # Responsibilities
//! - Flush every sink exactly once when the process is done logging
//! - Report flush failures without panicking during unwind

use crate::pipeline::registry::Registry;
use crate::sink::SinkError;

/// Flushes all sinks of a registry when shut down or dropped.
#[derive(Debug)]
pub struct ShutdownGuard {
    registry: Option<Registry>,
}

impl ShutdownGuard {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    /// Flush all sinks now and surface the first failure.
    pub fn shutdown(mut self) -> Result<(), SinkError> {
        match self.registry.take() {
            Some(registry) => {
                let result = registry.flush();
                tracing::debug!(ok = result.is_ok(), "Logging pipeline flushed");
                result
            }
            None => Ok(()),
        }
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.take() {
            if let Err(e) = registry.flush() {
                tracing::warn!(error = %e, "Failed to flush sinks on shutdown");
            }
        }
    }
}
