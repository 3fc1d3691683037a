//! Demo authentication step. Logs on the `auth` logger.

use crate::pipeline::registry::Registry;

pub const LOGGER: &str = "auth";

/// The only account that authenticates.
pub const VALID_USER: &str = "valid_user";

pub fn authenticate_user(registry: &Registry, username: &str) -> bool {
    let logger = registry.get_logger(LOGGER);
    logger.info(format!("Authenticating user: {username}"));
    if username != VALID_USER {
        logger.warning(format!("Authentication failed for user: {username}"));
        return false;
    }
    logger.info(format!("User {username} authenticated successfully"));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::demo_registry;

    #[test]
    fn test_rejected_user_logs_one_warning() {
        let (registry, sink) = demo_registry();
        assert!(!authenticate_user(&registry, "test_user"));
        assert_eq!(
            sink.lines(),
            vec!["auth - WARNING - Authentication failed for user: test_user"]
        );
    }

    #[test]
    fn test_valid_user_logs_nothing_below_warning() {
        let (registry, sink) = demo_registry();
        assert!(authenticate_user(&registry, VALID_USER));
        assert!(sink.is_empty());
    }
}
