//! Logger registry and logger handles.
//!
//! # Responsibilities
//! - Guarantee one logger node per name
//! - Resolve effective levels through the dot-separated name hierarchy
//! - Hold per-logger filters, handlers and the propagate flag
//!
//! # Design Decisions
//! - Explicit registry object (cloneable handle), no process-global state
//! - Only loggers that exist take part in resolution; intermediate names are
//!   never created implicitly
//! - The root logger always has an explicit level: the process-wide default

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::pipeline::filter::{Filter, FilterChain};
use crate::pipeline::level::Level;
use crate::pipeline::record::Record;
use crate::sink::{Handler, SinkError};

/// Name of the root logger.
pub const ROOT_LOGGER: &str = "root";

/// Separator between hierarchy segments (`app.db.pool`).
pub const SEPARATOR: char = '.';

const LEVEL_UNSET: u8 = 0;

/// State shared by every handle to one logger name.
#[derive(Debug)]
pub(crate) struct LoggerNode {
    pub(crate) name: String,
    level: AtomicU8,
    propagate: AtomicBool,
    pub(crate) filters: FilterChain,
    handlers: ArcSwap<Vec<Arc<Handler>>>,
}

impl LoggerNode {
    fn new(name: &str, level: Option<Level>) -> Self {
        Self {
            name: name.to_string(),
            level: AtomicU8::new(level.map_or(LEVEL_UNSET, Level::as_u8)),
            propagate: AtomicBool::new(true),
            filters: FilterChain::new(),
            handlers: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub(crate) fn level(&self) -> Option<Level> {
        Level::from_u8(self.level.load(Ordering::Acquire))
    }

    pub(crate) fn propagates(&self) -> bool {
        self.propagate.load(Ordering::Acquire)
    }

    pub(crate) fn handlers(&self) -> Arc<Vec<Arc<Handler>>> {
        self.handlers.load_full()
    }
}

struct RegistryInner {
    root: Arc<LoggerNode>,
    loggers: DashMap<String, Arc<LoggerNode>>,
}

/// Store of named loggers. Clones share the same loggers.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Create a registry whose root logger uses `default_level`.
    pub fn new(default_level: Level) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                root: Arc::new(LoggerNode::new(ROOT_LOGGER, Some(default_level))),
                loggers: DashMap::new(),
            }),
        }
    }

    pub fn root(&self) -> Logger {
        Logger {
            registry: self.clone(),
            node: Arc::clone(&self.inner.root),
        }
    }

    /// Return the logger for `name`, creating it with an unset level on first use.
    ///
    /// `""` and `"root"` return the root logger.
    pub fn get_logger(&self, name: &str) -> Logger {
        if name.is_empty() || name == ROOT_LOGGER {
            return self.root();
        }
        let node = self
            .inner
            .loggers
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(LoggerNode::new(name, None)))
            .value()
            .clone();
        Logger {
            registry: self.clone(),
            node,
        }
    }

    /// The process-wide default level (the root logger's level).
    pub fn default_level(&self) -> Level {
        self.inner.root.level().unwrap_or(Level::Warning)
    }

    /// Effective level for `name` without creating a logger for it.
    pub fn effective_level(&self, name: &str) -> Level {
        if let Some(level) = self.existing(name).and_then(|node| node.level()) {
            return level;
        }
        self.ancestors(name)
            .into_iter()
            .find_map(|node| node.level())
            .unwrap_or_else(|| self.default_level())
    }

    /// Names of all non-root loggers created so far, sorted.
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .loggers
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Flush every handler attached anywhere in the registry.
    ///
    /// All handlers are flushed even if one fails; the first failure is returned.
    pub fn flush(&self) -> Result<(), SinkError> {
        let mut first_error = None;
        for handler in self.all_handlers() {
            if let Err(e) = handler.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Every distinct handler attached to the root or any logger.
    pub fn all_handlers(&self) -> Vec<Arc<Handler>> {
        let mut nodes = vec![Arc::clone(&self.inner.root)];
        nodes.extend(self.inner.loggers.iter().map(|entry| Arc::clone(entry.value())));

        let mut seen: Vec<Arc<Handler>> = Vec::new();
        for node in nodes {
            for handler in node.handlers().iter() {
                if !seen.iter().any(|h| Arc::ptr_eq(h, handler)) {
                    seen.push(Arc::clone(handler));
                }
            }
        }
        seen
    }

    fn existing(&self, name: &str) -> Option<Arc<LoggerNode>> {
        if name.is_empty() || name == ROOT_LOGGER {
            return Some(Arc::clone(&self.inner.root));
        }
        self.inner
            .loggers
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Existing ancestors of `name`, nearest first, ending with the root.
    pub(crate) fn ancestors(&self, name: &str) -> Vec<Arc<LoggerNode>> {
        if name.is_empty() || name == ROOT_LOGGER {
            return Vec::new();
        }
        let mut nodes: Vec<Arc<LoggerNode>> = parent_names(name)
            .filter_map(|parent| self.inner.loggers.get(parent).map(|e| Arc::clone(e.value())))
            .collect();
        nodes.push(Arc::clone(&self.inner.root));
        nodes
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("default_level", &self.default_level())
            .field("loggers", &self.logger_names())
            .finish()
    }
}

/// `a.b.c` → `a.b`, `a`.
fn parent_names(name: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(parent_of(name), |current| parent_of(*current))
}

fn parent_of(name: &str) -> Option<&str> {
    name.rfind(SEPARATOR).map(|idx| &name[..idx])
}

/// Handle to a named logger. Cheap to clone.
#[derive(Clone)]
pub struct Logger {
    pub(crate) registry: Registry,
    pub(crate) node: Arc<LoggerNode>,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn is_root(&self) -> bool {
        Arc::ptr_eq(&self.node, &self.registry.inner.root)
    }

    /// True if both handles refer to the same logger.
    pub fn same_as(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Explicitly set level, if any.
    pub fn level(&self) -> Option<Level> {
        self.node.level()
    }

    pub fn set_level(&self, level: Level) {
        self.node.level.store(level.as_u8(), Ordering::Release);
    }

    /// Remove the explicit level so it is inherited again. No-op on the root.
    pub fn clear_level(&self) {
        if !self.is_root() {
            self.node.level.store(LEVEL_UNSET, Ordering::Release);
        }
    }

    /// Explicit level, else nearest explicit ancestor, else the default.
    pub fn effective_level(&self) -> Level {
        self.level().unwrap_or_else(|| {
            self.registry
                .ancestors(self.name())
                .into_iter()
                .find_map(|node| node.level())
                .unwrap_or_else(|| self.registry.default_level())
        })
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.effective_level()
    }

    pub fn propagate(&self) -> bool {
        self.node.propagates()
    }

    /// When false, ancestor handlers do not receive this logger's records.
    pub fn set_propagate(&self, propagate: bool) {
        self.node.propagate.store(propagate, Ordering::Release);
    }

    pub fn add_filter(&self, filter: Arc<dyn Filter>) {
        self.node.filters.add(filter);
    }

    pub fn add_handler(&self, handler: Arc<Handler>) {
        self.node.handlers.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(Arc::clone(&handler));
            next
        });
    }

    /// Handlers attached directly to this logger, in attachment order.
    pub fn handlers(&self) -> Vec<Arc<Handler>> {
        self.node.handlers().iter().cloned().collect()
    }

    /// Emit `message` at `level`.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        if !self.is_enabled_for(level) {
            return;
        }
        self.registry
            .dispatch(&self.node, &Record::new(self.name(), level, message));
    }

    /// Emit `message` at `level` with the error chain of `error` attached.
    pub fn log_error(
        &self,
        level: Level,
        message: impl Into<String>,
        error: &(dyn std::error::Error + 'static),
    ) {
        if !self.is_enabled_for(level) {
            return;
        }
        let record = Record::new(self.name(), level, message).with_error(error);
        self.registry.dispatch(&self.node, &record);
    }

    /// Dispatch a pre-built record, applying this logger's level and filters.
    pub fn handle(&self, record: &Record) {
        if !self.is_enabled_for(record.level()) {
            return;
        }
        self.registry.dispatch(&self.node, record);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::Critical, message);
    }

    /// `Error`-level record carrying `error`'s chain.
    pub fn exception(&self, message: impl Into<String>, error: &(dyn std::error::Error + 'static)) {
        self.log_error(Level::Error, message, error);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.level())
            .field("propagate", &self.propagate())
            .finish()
    }
}
