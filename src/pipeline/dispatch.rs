//! Record dispatch: logger filters, handler fan-out, propagation.
//!
//! # Responsibilities
//! - Apply the originating logger's filter chain
//! - Collect handlers reachable from the logger (own first, then ancestors)
//! - Invoke each handler in order; report failures without aborting the rest
//!
//! # Design Decisions
//! - The level check happens in `Logger` before a record is built
//! - Ancestor levels and ancestor logger filters are not consulted for
//!   propagated records; only their handlers are
//! - `propagate = false` on a logger stops the walk after its own handlers
//! - `log` never fails; sink errors become internal diagnostics and metrics

use std::sync::Arc;

use crate::observability::metrics;
use crate::pipeline::record::Record;
use crate::pipeline::registry::{LoggerNode, Registry};
use crate::sink::Handler;

impl Registry {
    pub(crate) fn dispatch(&self, origin: &LoggerNode, record: &Record) {
        if !origin.filters.should_emit(record) {
            metrics::record_filtered("logger");
            return;
        }

        let handlers = self.reachable_handlers(origin);
        if handlers.is_empty() {
            metrics::record_unhandled(&origin.name);
            return;
        }

        for handler in handlers {
            match handler.handle(record) {
                Ok(true) => metrics::record_written(handler.name()),
                Ok(false) => metrics::record_filtered("handler"),
                Err(e) => {
                    metrics::record_sink_error(handler.name());
                    tracing::warn!(
                        sink = %e.sink,
                        logger = %record.logger(),
                        error = %e.source,
                        "Failed to emit log record"
                    );
                }
            }
        }
    }

    /// Handlers a record from `origin` reaches, in invocation order.
    pub(crate) fn reachable_handlers(&self, origin: &LoggerNode) -> Vec<Arc<Handler>> {
        let mut handlers: Vec<Arc<Handler>> = origin.handlers().iter().cloned().collect();
        if !origin.propagates() {
            return handlers;
        }

        for ancestor in self.ancestors(&origin.name) {
            handlers.extend(ancestor.handlers().iter().cloned());
            if !ancestor.propagates() {
                break;
            }
        }
        handlers
    }
}
