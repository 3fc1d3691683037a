//! Record filters.
//!
//! # Responsibilities
//! - Veto individual records independent of severity
//! - Combine predicates with AND semantics, in attachment order
//!
//! # Design Decisions
//! - Filters are pure: same record, same answer
//! - Name matching is a literal string prefix for [`ExcludePrefix`] and
//!   hierarchy-aware for [`AllowHierarchy`]
//! - Chains are copy-on-write so attaching never blocks dispatch

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::pipeline::level::Level;
use crate::pipeline::record::Record;

/// Predicate over records. Returns `true` to keep the record.
pub trait Filter: Send + Sync + fmt::Debug {
    fn keep(&self, record: &Record) -> bool;
}

/// Rejects records whose logger name starts with `prefix`.
#[derive(Debug, Clone)]
pub struct ExcludePrefix {
    prefix: String,
}

impl ExcludePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Filter for ExcludePrefix {
    fn keep(&self, record: &Record) -> bool {
        !record.logger().starts_with(&self.prefix)
    }
}

/// Keeps only records from logger `name` and its descendants.
///
/// `AllowHierarchy::new("a.b")` keeps `a.b` and `a.b.c` but not `a.bc`.
/// An empty name keeps everything.
#[derive(Debug, Clone)]
pub struct AllowHierarchy {
    name: String,
}

impl AllowHierarchy {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Filter for AllowHierarchy {
    fn keep(&self, record: &Record) -> bool {
        if self.name.is_empty() {
            return true;
        }
        match record.logger().strip_prefix(self.name.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

/// Keeps records at or below `level`.
#[derive(Debug, Clone, Copy)]
pub struct MaxLevel {
    level: Level,
}

impl MaxLevel {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Filter for MaxLevel {
    fn keep(&self, record: &Record) -> bool {
        record.level() <= self.level
    }
}

/// Adapts a closure into a [`Filter`].
pub struct FnFilter<F> {
    label: &'static str,
    predicate: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    pub fn new(label: &'static str, predicate: F) -> Self {
        Self { label, predicate }
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("label", &self.label).finish()
    }
}

impl<F> Filter for FnFilter<F>
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    fn keep(&self, record: &Record) -> bool {
        (self.predicate)(record)
    }
}

/// Ordered set of filters attached to a logger or handler.
pub struct FilterChain {
    filters: ArcSwap<Vec<Arc<dyn Filter>>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self {
            filters: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append a filter. It is evaluated after every filter already attached.
    pub fn add(&self, filter: Arc<dyn Filter>) {
        self.filters.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(Arc::clone(&filter));
            next
        });
    }

    /// Returns true if every filter keeps the record. Stops at the first veto.
    pub fn should_emit(&self, record: &Record) -> bool {
        self.filters.load().iter().all(|f| f.keep(record))
    }

    pub fn len(&self) -> usize {
        self.filters.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.filters.load().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(name: &str, level: Level) -> Record {
        Record::new(name, level, "msg")
    }

    #[test]
    fn test_exclude_prefix() {
        let filter = ExcludePrefix::new("auth");
        assert!(!filter.keep(&record("auth", Level::Warning)));
        assert!(!filter.keep(&record("auth.session", Level::Warning)));
        assert!(filter.keep(&record("database", Level::Warning)));
        assert!(filter.keep(&record("app.auth", Level::Warning)));
    }

    #[test]
    fn test_allow_hierarchy() {
        let filter = AllowHierarchy::new("a.b");
        assert!(filter.keep(&record("a.b", Level::Info)));
        assert!(filter.keep(&record("a.b.c", Level::Info)));
        assert!(!filter.keep(&record("a.bc", Level::Info)));
        assert!(!filter.keep(&record("a", Level::Info)));
        assert!(AllowHierarchy::new("").keep(&record("anything", Level::Info)));
    }

    #[test]
    fn test_max_level() {
        let filter = MaxLevel::new(Level::Info);
        assert!(filter.keep(&record("x", Level::Debug)));
        assert!(filter.keep(&record("x", Level::Info)));
        assert!(!filter.keep(&record("x", Level::Warning)));
    }

    #[test]
    fn test_empty_chain_keeps_everything() {
        let chain = FilterChain::new();
        assert!(chain.is_empty());
        assert!(chain.should_emit(&record("auth", Level::Debug)));
    }

    #[test]
    fn test_chain_short_circuits_on_first_veto() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let chain = FilterChain::new();
        chain.add(Arc::new(ExcludePrefix::new("auth")));
        chain.add(Arc::new(FnFilter::new("counting", move |_: &Record| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })));
        assert_eq!(chain.len(), 2);

        assert!(!chain.should_emit(&record("auth", Level::Error)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(chain.should_emit(&record("utils", Level::Error)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
