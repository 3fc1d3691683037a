//! Pipeline metrics.
//!
//! # Metrics
//! - `log_pipeline_records_written_total` (counter): records written, by sink
//! - `log_pipeline_records_filtered_total` (counter): records vetoed, by stage
//!   (`logger` | `handler`)
//! - `log_pipeline_records_unhandled_total` (counter): accepted records with no
//!   reachable handler, by logger
//! - `log_pipeline_rotations_total` (counter): file rotations, by path
//! - `log_pipeline_sink_errors_total` (counter): failed writes, by sink
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; the embedding application chooses (or
//!   omits) the recorder
//! - Every update is a single counter increment

pub fn record_written(sink: &str) {
    ::metrics::counter!("log_pipeline_records_written_total", "sink" => sink.to_string())
        .increment(1);
}

pub fn record_filtered(stage: &'static str) {
    ::metrics::counter!("log_pipeline_records_filtered_total", "stage" => stage).increment(1);
}

pub fn record_unhandled(logger: &str) {
    ::metrics::counter!("log_pipeline_records_unhandled_total", "logger" => logger.to_string())
        .increment(1);
}

pub fn record_rotation(path: &str) {
    ::metrics::counter!("log_pipeline_rotations_total", "path" => path.to_string()).increment(1);
}

pub fn record_sink_error(sink: &str) {
    ::metrics::counter!("log_pipeline_sink_errors_total", "sink" => sink.to_string())
        .increment(1);
}
