//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (attachments reference existing sinks and filters)
//! - Validate logger names and format templates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PipelineConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::config::schema::{FormatConfig, PipelineConfig, SinkKind};
use crate::format::{FormatError, Formatter};
use crate::pipeline::registry::{ROOT_LOGGER, SEPARATOR};

/// A semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{owner} references unknown sink `{sink}`")]
    UnknownSink { owner: String, sink: String },

    #[error("{owner} references unknown filter `{filter}`")]
    UnknownFilter { owner: String, filter: String },

    #[error("{owner} lists `{name}` more than once")]
    DuplicateAttachment { owner: String, name: String },

    #[error("invalid logger name `{0}`")]
    InvalidLoggerName(String),

    #[error("rotating file sink `{0}` has no path")]
    MissingPath(String),

    #[error("{owner} has an invalid format: {reason}")]
    InvalidFormat { owner: String, reason: FormatError },
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_format("format", &config.format, &mut errors);

    for (name, sink) in &config.sinks {
        let owner = format!("sink `{name}`");
        if sink.kind == SinkKind::RotatingFile
            && sink.path.as_ref().map_or(true, |p| p.as_os_str().is_empty())
        {
            errors.push(ValidationError::MissingPath(name.clone()));
        }
        if let Some(format) = &sink.format {
            check_format(&owner, format, &mut errors);
        }
        check_filters(&owner, &sink.filters, &config.filters, &mut errors);
    }

    check_sinks("root", &config.root.sinks, config, &mut errors);
    check_filters("root", &config.root.filters, &config.filters, &mut errors);

    for (name, logger) in &config.loggers {
        if !is_valid_logger_name(name) {
            errors.push(ValidationError::InvalidLoggerName(name.clone()));
        }
        let owner = format!("logger `{name}`");
        check_sinks(&owner, &logger.sinks, config, &mut errors);
        check_filters(&owner, &logger.filters, &config.filters, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-empty dot-separated segments, and not the reserved root name.
pub fn is_valid_logger_name(name: &str) -> bool {
    name != ROOT_LOGGER
        && !name.is_empty()
        && name
            .split(SEPARATOR)
            .all(|segment| !segment.is_empty() && !segment.chars().any(char::is_whitespace))
}

fn check_format(owner: &str, format: &FormatConfig, errors: &mut Vec<ValidationError>) {
    if let Err(reason) = Formatter::new(&format.pattern, &format.datefmt) {
        errors.push(ValidationError::InvalidFormat {
            owner: owner.to_string(),
            reason,
        });
    }
}

fn check_sinks(
    owner: &str,
    sinks: &[String],
    config: &PipelineConfig,
    errors: &mut Vec<ValidationError>,
) {
    check_duplicates(owner, sinks, errors);
    for sink in sinks {
        if !config.sinks.contains_key(sink) {
            errors.push(ValidationError::UnknownSink {
                owner: owner.to_string(),
                sink: sink.clone(),
            });
        }
    }
}

fn check_filters<V>(
    owner: &str,
    filters: &[String],
    defined: &BTreeMap<String, V>,
    errors: &mut Vec<ValidationError>,
) {
    check_duplicates(owner, filters, errors);
    for filter in filters {
        if !defined.contains_key(filter) {
            errors.push(ValidationError::UnknownFilter {
                owner: owner.to_string(),
                filter: filter.clone(),
            });
        }
    }
}

fn check_duplicates(owner: &str, names: &[String], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateAttachment {
                owner: owner.to_string(),
                name: name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LoggerConfig, SinkConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&PipelineConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = PipelineConfig::default();
        config.root.sinks.push("syslog".into());
        config.root.sinks.push("console".into());
        config.sinks.insert(
            "broken".into(),
            SinkConfig {
                kind: SinkKind::RotatingFile,
                ..SinkConfig::default()
            },
        );
        config.loggers.insert(
            "bad..name".into(),
            LoggerConfig {
                filters: vec!["nope".into()],
                ..LoggerConfig::default()
            },
        );

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors.contains(&ValidationError::MissingPath("broken".into())));
        assert!(errors.contains(&ValidationError::UnknownSink {
            owner: "root".into(),
            sink: "syslog".into(),
        }));
        assert!(errors.contains(&ValidationError::DuplicateAttachment {
            owner: "root".into(),
            name: "console".into(),
        }));
        assert!(errors.contains(&ValidationError::InvalidLoggerName("bad..name".into())));
        assert!(errors.contains(&ValidationError::UnknownFilter {
            owner: "logger `bad..name`".into(),
            filter: "nope".into(),
        }));
    }

    #[test]
    fn test_invalid_formats_are_reported() {
        let mut config = PipelineConfig::default();
        config.format.pattern = "{when} {message}".into();
        if let Some(console) = config.sinks.get_mut("console") {
            console.format = Some(FormatConfig {
                pattern: "{message}".into(),
                datefmt: "%Q".into(),
            });
        }

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            ValidationError::InvalidFormat { owner, .. } if owner == "format"
        ));
        assert!(matches!(
            &errors[1],
            ValidationError::InvalidFormat { owner, .. } if owner == "sink `console`"
        ));
    }

    #[test]
    fn test_logger_names() {
        assert!(is_valid_logger_name("auth"));
        assert!(is_valid_logger_name("app.db.pool"));
        assert!(!is_valid_logger_name(""));
        assert!(!is_valid_logger_name("root"));
        assert!(!is_valid_logger_name(".auth"));
        assert!(!is_valid_logger_name("auth."));
        assert!(!is_valid_logger_name("my logger"));
    }
}
