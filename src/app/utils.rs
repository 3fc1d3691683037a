//! Demo helper step. Logs on the `utils` logger.

use crate::pipeline::registry::Registry;

pub const LOGGER: &str = "utils";

pub fn helper_function(registry: &Registry) {
    let logger = registry.get_logger(LOGGER);
    logger.debug("Starting helper function");
    logger.debug("Helper function is performing a task");
    logger.info("Helper function finished");
}
