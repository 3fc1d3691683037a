//! Handler: a sink plus its formatter, threshold and filters.

use std::sync::Arc;

use crate::format::Formatter;
use crate::pipeline::filter::{Filter, FilterChain};
use crate::pipeline::level::Level;
use crate::pipeline::record::Record;
use crate::sink::{Sink, SinkError};

/// Named attachment point between loggers and a sink.
///
/// A handler is shared (`Arc<Handler>`) by every logger it is attached to, so
/// a record reaching it through several loggers is still written through one
/// sink in call order.
#[derive(Debug)]
pub struct Handler {
    name: String,
    sink: Arc<dyn Sink>,
    formatter: Formatter,
    level: Option<Level>,
    filters: FilterChain,
}

impl Handler {
    pub fn new(name: impl Into<String>, sink: Arc<dyn Sink>) -> Self {
        Self {
            name: name.into(),
            sink,
            formatter: Formatter::default(),
            level: None,
            filters: FilterChain::new(),
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Only records at or above `level` are written.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_filter(self, filter: Arc<dyn Filter>) -> Self {
        self.filters.add(filter);
        self
    }

    pub fn add_filter(&self, filter: Arc<dyn Filter>) {
        self.filters.add(filter);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Gate, render and write `record`.
    ///
    /// Returns `Ok(false)` when the threshold or a filter rejected the record.
    pub fn handle(&self, record: &Record) -> Result<bool, SinkError> {
        if self.level.is_some_and(|min| record.level() < min) {
            return Ok(false);
        }
        if !self.filters.should_emit(record) {
            return Ok(false);
        }

        let line = self.formatter.render(record);
        self.sink.write(&line).map_err(|source| SinkError {
            sink: self.name.clone(),
            source,
        })?;
        Ok(true)
    }

    pub fn flush(&self) -> Result<(), SinkError> {
        self.sink.flush().map_err(|source| SinkError {
            sink: self.name.clone(),
            source,
        })
    }
}
