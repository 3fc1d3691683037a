//! Demo application driving the pipeline.
//!
//! # Data Flow
//! ```text
//! run()
//!     → "app" logger: start
//!     → database::db_function  ("database" logger)
//!     → auth::authenticate_user ("auth" logger)
//!     → utils::helper_function ("utils" logger)
//!     → "app" logger: finish
//! ```
//!
//! Each step only emits records; which of them land in which sink is decided
//! entirely by the registry's configuration.

pub mod auth;
pub mod database;
pub mod utils;

use crate::pipeline::registry::Registry;

pub const LOGGER: &str = "app";

/// Run every demo step in order.
pub fn run(registry: &Registry, user: &str, database_url: &str) {
    let logger = registry.get_logger(LOGGER);
    logger.info("Starting the application");
    database::db_function(registry, database_url);
    auth::authenticate_user(registry, user);
    utils::helper_function(registry);
    logger.info("Application finished");
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::format::Formatter;
    use crate::pipeline::level::Level;
    use crate::sink::{Handler, MemorySink};

    /// Registry with the demo logger levels and one memory sink on the root.
    pub(crate) fn demo_registry() -> (Registry, Arc<MemorySink>) {
        let registry = Registry::new(Level::Info);
        registry.get_logger(auth::LOGGER).set_level(Level::Warning);
        registry.get_logger(database::LOGGER).set_level(Level::Info);
        registry.get_logger(utils::LOGGER).set_level(Level::Debug);

        let sink = Arc::new(MemorySink::new());
        let formatter = Formatter::new("{name} - {levelname} - {message}", "%H:%M:%S").unwrap();
        registry.root().add_handler(Arc::new(
            Handler::new("memory", sink.clone()).with_formatter(formatter),
        ));
        (registry, sink)
    }

    #[test]
    fn test_run_emits_expected_sequence() {
        let (registry, sink) = demo_registry();
        run(&registry, "test_user", "sqlite://app.db");

        assert_eq!(
            sink.lines(),
            vec![
                "app - INFO - Starting the application",
                "database - INFO - Starting database function",
                "database - INFO - Connected to the database",
                "database - INFO - Database function finished",
                "auth - WARNING - Authentication failed for user: test_user",
                "utils - DEBUG - Starting helper function",
                "utils - DEBUG - Helper function is performing a task",
                "utils - INFO - Helper function finished",
                "app - INFO - Application finished",
            ]
        );
    }
}
