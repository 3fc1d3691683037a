//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log_pipeline::format::Formatter;
use log_pipeline::pipeline::{ExcludePrefix, Level, Registry};
use log_pipeline::sink::{Handler, MemorySink};

/// Layout without timestamps, so lines can be compared verbatim.
pub const PLAIN_PATTERN: &str = "{name} - {levelname} - {message}";

/// A handler writing plain lines into a fresh memory sink.
pub fn memory_handler(name: &str) -> (Handler, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let formatter = Formatter::new(PLAIN_PATTERN, "%H:%M:%S").unwrap();
    let handler = Handler::new(name, sink.clone()).with_formatter(formatter);
    (handler, sink)
}

/// The demo setup with memory sinks standing in for the file and console.
pub struct DemoPipeline {
    pub registry: Registry,
    pub file: Arc<MemorySink>,
    pub console: Arc<MemorySink>,
}

/// Root at INFO with a "file" sink that excludes `auth` and an unfiltered
/// "console" sink; `auth` WARNING, `database` INFO, `utils` DEBUG.
pub fn demo_pipeline() -> DemoPipeline {
    let registry = Registry::new(Level::Info);
    registry.get_logger("auth").set_level(Level::Warning);
    registry.get_logger("database").set_level(Level::Info);
    registry.get_logger("utils").set_level(Level::Debug);

    let (file_handler, file) = memory_handler("file");
    let file_handler = file_handler.with_filter(Arc::new(ExcludePrefix::new("auth")));
    let (console_handler, console) = memory_handler("console");

    let root = registry.root();
    root.add_handler(Arc::new(file_handler));
    root.add_handler(Arc::new(console_handler));

    DemoPipeline {
        registry,
        file,
        console,
    }
}

/// Lines of a text file; empty when it does not exist.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
