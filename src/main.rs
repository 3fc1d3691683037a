//! Logging pipeline demo (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!   app steps                 ┌────────────────────── REGISTRY ──────────────────────┐
//!   (auth, database, utils)   │                                                       │
//!   ──── Logger::log ────────▶│  level gate → logger filters → reachable handlers    │
//!                             │                                     │                 │
//!   tracing events            │                     ┌───────────────┼─────────────┐   │
//!   ──── PipelineLayer ──────▶│                     ▼               ▼             ▼   │
//!                             │             handler level    handler filters  format  │
//!                             │                     │                               │ │
//!                             │                     ▼                               ▼ │
//!                             │              RotatingFileSink                 Console │
//!                             │              app.log, .1 .. .N                 stdout │
//!                             └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, Layer};

use log_pipeline::config::{load_config, PipelineConfig};
use log_pipeline::lifecycle::{build_registry, ShutdownGuard};
use log_pipeline::observability::PipelineLayer;

#[derive(Parser)]
#[command(name = "log-pipeline")]
#[command(about = "Run the demo application through a logging pipeline", long_about = None)]
struct Cli {
    /// TOML pipeline configuration; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// User name passed to the authentication step
    #[arg(short, long, default_value = "test_user")]
    user: String,

    /// Connection URL used by the database step
    #[arg(long, default_value = "sqlite://app.db")]
    database_url: String,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Empty until the registry is built.
    let (pipeline_layer, pipeline_slot) = reload::Layer::new(None::<PipelineLayer>);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "log_pipeline=warn".into()),
                ),
        )
        .with(pipeline_layer)
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let registry = build_registry(&config)?;
    pipeline_slot.reload(Some(PipelineLayer::new(registry.clone())))?;

    tracing::debug!(
        loggers = ?registry.logger_names(),
        "Pipeline ready"
    );

    let guard = ShutdownGuard::new(registry.clone());
    log_pipeline::app::run(&registry, &cli.user, &cli.database_url);
    guard.shutdown()?;
    Ok(())
}
