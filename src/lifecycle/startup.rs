//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build filters, open sinks, compile formatters
//! - Create loggers, set levels, attach filters and handlers in config order
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal (unwritable log path included)
//! - Each sink is opened once and shared by every logger that lists it
//! - Loggers are configured after all sinks are open, so a failure leaves
//!   nothing half-attached

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{PipelineConfig, SinkConfig, SinkKind};
use crate::config::validation::validate_config;
use crate::format::{FormatError, Formatter};
use crate::pipeline::filter::Filter;
use crate::pipeline::registry::{Logger, Registry};
use crate::sink::{ConsoleSink, Handler, RotatingFileSink, Sink};

/// Error raised while building a pipeline.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid format: {0}")]
    Format(#[from] FormatError),

    #[error("failed to open sink `{name}` at {}: {source}", .path.display())]
    OpenSink {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load a TOML config file and build a registry from it.
pub fn build_from_file(path: &Path) -> Result<Registry, StartupError> {
    let config = load_config(path)?;
    build_registry(&config)
}

/// Build a fully configured registry from `config`.
pub fn build_registry(config: &PipelineConfig) -> Result<Registry, StartupError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let base_formatter = Formatter::new(&config.format.pattern, &config.format.datefmt)?;
    let filters: BTreeMap<&str, Arc<dyn Filter>> = config
        .filters
        .iter()
        .map(|(name, filter)| (name.as_str(), filter.build()))
        .collect();

    let mut handlers: BTreeMap<&str, Arc<Handler>> = BTreeMap::new();
    for (name, sink_config) in &config.sinks {
        let handler = build_handler(name, sink_config, &base_formatter, &filters)?;
        handlers.insert(name.as_str(), Arc::new(handler));
    }

    let registry = Registry::new(config.root.level);
    attach(
        &registry.root(),
        &config.root.filters,
        &config.root.sinks,
        &filters,
        &handlers,
    );

    for (name, logger_config) in &config.loggers {
        let logger = registry.get_logger(name);
        if let Some(level) = logger_config.level {
            logger.set_level(level);
        }
        logger.set_propagate(logger_config.propagate);
        attach(
            &logger,
            &logger_config.filters,
            &logger_config.sinks,
            &filters,
            &handlers,
        );
    }

    tracing::info!(
        default_level = %config.root.level,
        sinks = handlers.len(),
        loggers = config.loggers.len(),
        "Logging pipeline configured"
    );
    Ok(registry)
}

fn build_handler(
    name: &str,
    config: &SinkConfig,
    base_formatter: &Formatter,
    filters: &BTreeMap<&str, Arc<dyn Filter>>,
) -> Result<Handler, StartupError> {
    let sink: Arc<dyn Sink> = match config.kind {
        SinkKind::Console => Arc::new(ConsoleSink::new(config.stream)),
        SinkKind::RotatingFile => {
            let path = config.path.clone().unwrap_or_default();
            let sink = RotatingFileSink::open(&path, config.max_bytes, config.backup_count)
                .map_err(|source| StartupError::OpenSink {
                    name: name.to_string(),
                    path,
                    source,
                })?;
            tracing::debug!(
                sink = name,
                path = %sink.path().display(),
                max_bytes = config.max_bytes,
                backup_count = config.backup_count,
                "Opened rotating file sink"
            );
            Arc::new(sink)
        }
    };

    let formatter = match &config.format {
        Some(format) => Formatter::new(&format.pattern, &format.datefmt)?,
        None => base_formatter.clone(),
    };

    let mut handler = Handler::new(name, sink).with_formatter(formatter);
    if let Some(level) = config.level {
        handler = handler.with_level(level);
    }
    for filter in &config.filters {
        if let Some(filter) = filters.get(filter.as_str()) {
            handler.add_filter(Arc::clone(filter));
        }
    }
    Ok(handler)
}

fn attach(
    logger: &Logger,
    filter_names: &[String],
    sink_names: &[String],
    filters: &BTreeMap<&str, Arc<dyn Filter>>,
    handlers: &BTreeMap<&str, Arc<Handler>>,
) {
    for name in filter_names {
        if let Some(filter) = filters.get(name.as_str()) {
            logger.add_filter(Arc::clone(filter));
        }
    }
    for name in sink_names {
        if let Some(handler) = handlers.get(name.as_str()) {
            logger.add_handler(Arc::clone(handler));
        }
    }
}
