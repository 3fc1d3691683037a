//! Demo database step. Logs on the `database` logger.
//!
//! A failed connect is logged with its cause chain and the step carries on.

use thiserror::Error;

use crate::pipeline::registry::Registry;

pub const LOGGER: &str = "database";

const SUPPORTED_SCHEMES: &[&str] = &["sqlite", "postgres", "mysql"];

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("cannot connect to `{url}`")]
    Connect {
        url: String,
        #[source]
        source: UrlError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("missing `://` separator")]
    MissingScheme,

    #[error("unsupported scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("empty database location")]
    EmptyLocation,
}

/// A parsed connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub scheme: String,
    pub location: String,
}

/// Parse `url` into a connection target.
pub fn connect(url: &str) -> Result<Connection, DatabaseError> {
    parse_url(url).map_err(|source| DatabaseError::Connect {
        url: url.to_string(),
        source,
    })
}

fn parse_url(url: &str) -> Result<Connection, UrlError> {
    let (scheme, location) = url.split_once("://").ok_or(UrlError::MissingScheme)?;
    if !SUPPORTED_SCHEMES.contains(&scheme) {
        return Err(UrlError::UnsupportedScheme(scheme.to_string()));
    }
    if location.is_empty() {
        return Err(UrlError::EmptyLocation);
    }
    Ok(Connection {
        scheme: scheme.to_string(),
        location: location.to_string(),
    })
}

pub fn db_function(registry: &Registry, url: &str) {
    let logger = registry.get_logger(LOGGER);
    logger.info("Starting database function");
    logger.debug("Attempting to connect to the database");
    match connect(url) {
        Ok(connection) => {
            logger.debug(format!("Using {} backend", connection.scheme));
            logger.info("Connected to the database");
        }
        Err(e) => logger.exception("Database connection failed", &e),
    }
    logger.info("Database function finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::demo_registry;

    #[test]
    fn test_parse_url() {
        assert_eq!(
            connect("sqlite://app.db").unwrap(),
            Connection {
                scheme: "sqlite".into(),
                location: "app.db".into(),
            }
        );
        assert!(matches!(
            parse_url("app.db"),
            Err(UrlError::MissingScheme)
        ));
        assert_eq!(
            parse_url("redis://x"),
            Err(UrlError::UnsupportedScheme("redis".into()))
        );
        assert_eq!(parse_url("postgres://"), Err(UrlError::EmptyLocation));
    }

    #[test]
    fn test_successful_connect_logs_info_only() {
        let (registry, sink) = demo_registry();
        db_function(&registry, "sqlite://app.db");
        assert_eq!(
            sink.lines(),
            vec![
                "database - INFO - Starting database function",
                "database - INFO - Connected to the database",
                "database - INFO - Database function finished",
            ]
        );
    }

    #[test]
    fn test_failed_connect_is_logged_with_cause_and_continues() {
        let (registry, sink) = demo_registry();
        db_function(&registry, "redis://cache");

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "database - ERROR - Database connection failed\n\
             Error: cannot connect to `redis://cache`\n\
             Caused by: unsupported scheme `redis`"
        );
        assert_eq!(lines[2], "database - INFO - Database function finished");
    }
}
