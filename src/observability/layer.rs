//! `tracing` bridge.
//!
//! # Responsibilities
//! - Route `tracing` events into the pipeline, using the event target as the
//!   logger name (`my_crate::db` → `my_crate.db`)
//! - Flatten the event's `message` and extra fields into one message string
//!
//! # Design Decisions
//! - Events emitted by this crate are skipped; a sink failure reported through
//!   `tracing` must never re-enter the sink that failed
//! - Level gating is the pipeline's: the layer does not filter on its own

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::pipeline::level::Level;
use crate::pipeline::registry::{Registry, SEPARATOR};

/// Target prefix of this crate's own diagnostics.
const SELF_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Forwards `tracing` events to loggers of a [`Registry`].
#[derive(Debug, Clone)]
pub struct PipelineLayer {
    registry: Registry,
}

impl PipelineLayer {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl<S> Layer<S> for PipelineLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let logger = self.registry.get_logger(&logger_name(metadata.target()));
        let level = Level::from(*metadata.level());
        if !logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        logger.log(level, visitor.finish());
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(SELF_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Map a module-path target onto the dot hierarchy.
pub fn logger_name(target: &str) -> String {
    target.replace("::", &SEPARATOR.to_string())
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }
}
