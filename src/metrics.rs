use crate::webhook::JobOutcome;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder
///
/// Fails if a global recorder is already installed (e.g., in tests).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "logbuddy_events_ingested_total",
        "Total number of log events stored, by ingestion path"
    );
    describe_counter!(
        "logbuddy_webhook_jobs_total",
        "Webhook ingestion jobs by terminal outcome"
    );
    describe_histogram!(
        "logbuddy_store_operation_duration_seconds",
        "Event store operation duration in seconds"
    );
    describe_counter!(
        "logbuddy_exports_total",
        "Completed CSV exports"
    );
    describe_counter!(
        "logbuddy_exported_records_total",
        "Rows written by CSV exports"
    );
    describe_gauge!(
        "logbuddy_info",
        "Service version information"
    );

    gauge!("logbuddy_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a stored event; `path` is "direct" or "webhook"
pub fn record_event_ingested(path: &str, level: &str) {
    counter!(
        "logbuddy_events_ingested_total",
        "path" => path.to_string(),
        "level" => level.to_string(),
    )
    .increment(1);
}

/// Record the terminal state of a webhook job
pub fn record_webhook_job(outcome: JobOutcome) {
    counter!("logbuddy_webhook_jobs_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record store operation latency
pub fn record_store_operation(operation: &'static str, duration: Duration) {
    histogram!(
        "logbuddy_store_operation_duration_seconds",
        "operation" => operation,
    )
    .record(duration.as_secs_f64());
}

/// Record a finished export
pub fn record_export(records: usize) {
    counter!("logbuddy_exports_total").increment(1);
    counter!("logbuddy_exported_records_total").increment(records as u64);
}
