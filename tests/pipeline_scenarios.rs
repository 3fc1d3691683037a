//! End-to-end dispatch scenarios over the demo logger layout.

use std::sync::Arc;
use std::thread;

use log_pipeline::pipeline::{ExcludePrefix, Level, Registry};
use log_pipeline::PipelineLayer;
use tracing_subscriber::layer::SubscriberExt;

mod common;

#[test]
fn test_auth_info_is_below_threshold() {
    let demo = common::demo_pipeline();
    demo.registry
        .get_logger("auth")
        .info("Authenticating user: test_user");

    assert!(demo.file.is_empty());
    assert!(demo.console.is_empty());
}

#[test]
fn test_auth_warning_skips_the_excluding_sink() {
    let demo = common::demo_pipeline();
    demo.registry
        .get_logger("auth")
        .warning("Authentication failed for user: test_user");

    assert!(demo.file.is_empty());
    assert_eq!(
        demo.console.lines(),
        vec!["auth - WARNING - Authentication failed for user: test_user"]
    );
}

#[test]
fn test_utils_debug_reaches_every_sink_in_order() {
    let demo = common::demo_pipeline();
    let utils = demo.registry.get_logger("utils");
    utils.debug("Starting helper function");
    utils.debug("Helper function is performing a task");
    utils.info("Helper function finished");

    let expected = vec![
        "utils - DEBUG - Starting helper function",
        "utils - DEBUG - Helper function is performing a task",
        "utils - INFO - Helper function finished",
    ];
    assert_eq!(demo.file.lines(), expected);
    assert_eq!(demo.console.lines(), expected);
}

#[test]
fn test_prefix_exclusion_on_a_logger_silences_it_everywhere() {
    let demo = common::demo_pipeline();
    let auth = demo.registry.get_logger("auth");
    auth.add_filter(Arc::new(ExcludePrefix::new("auth")));

    auth.error("never written");
    demo.registry.get_logger("auth.tokens").error("child of auth");
    demo.registry.get_logger("database").error("still written");

    // Logger filters belong to the originating logger only.
    assert_eq!(demo.console.len(), 2);
    assert_eq!(
        demo.file.lines(),
        vec!["database - ERROR - still written"]
    );
}

#[test]
fn test_unconfigured_loggers_inherit_from_nearest_ancestor() {
    let demo = common::demo_pipeline();
    let registry = &demo.registry;

    assert_eq!(registry.effective_level("utils.strings"), Level::Debug);
    assert_eq!(registry.effective_level("auth.tokens.jwt"), Level::Warning);
    assert_eq!(registry.effective_level("unknown"), Level::Info);

    registry.get_logger("utils.strings").debug("inherited");
    registry.get_logger("unknown").debug("dropped");
    assert_eq!(demo.console.lines(), vec!["utils.strings - DEBUG - inherited"]);
}

#[test]
fn test_level_changes_apply_to_descendants_immediately() {
    let demo = common::demo_pipeline();
    let child = demo.registry.get_logger("database.pool");
    child.debug("dropped");

    demo.registry.get_logger("database").set_level(Level::Debug);
    child.debug("kept");

    assert_eq!(demo.console.lines(), vec!["database.pool - DEBUG - kept"]);
}

#[test]
fn test_concurrent_logging_loses_no_records() {
    let demo = common::demo_pipeline();
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let registry = demo.registry.clone();
            thread::spawn(move || {
                let logger = registry.get_logger(&format!("worker.{worker}"));
                for i in 0..50 {
                    logger.info(format!("record {i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(demo.file.len(), 400);
    assert_eq!(demo.console.len(), 400);
    // Per-logger order is preserved within a sink.
    let worker_zero: Vec<_> = demo
        .console
        .lines()
        .into_iter()
        .filter(|line| line.starts_with("worker.0 "))
        .collect();
    let expected: Vec<_> = (0..50)
        .map(|i| format!("worker.0 - INFO - record {i}"))
        .collect();
    assert_eq!(worker_zero, expected);
}

#[test]
fn test_tracing_events_are_routed_by_target() {
    let registry = Registry::new(Level::Warning);
    let (handler, sink) = common::memory_handler("memory");
    let payments = registry.get_logger("payments");
    payments.set_level(Level::Info);
    payments.add_handler(Arc::new(handler));

    let subscriber = tracing_subscriber::registry().with(PipelineLayer::new(registry.clone()));
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "payments::gateway", amount = 42, "charge accepted");
        tracing::debug!(target: "payments::gateway", "below threshold");
        tracing::info!(target: "inventory", "no handlers reachable at warning");
    });

    assert_eq!(
        sink.lines(),
        vec!["payments.gateway - INFO - charge accepted amount=42"]
    );
}
