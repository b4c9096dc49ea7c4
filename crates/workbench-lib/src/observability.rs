//! Observability infrastructure for the workbench
//!
//! Provides:
//! - Prometheus metrics (fallback usage, prediction outcomes, request latency)
//! - Structured logging with tracing

use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for remote call latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<WorkbenchMetricsInner> = OnceLock::new();

struct WorkbenchMetricsInner {
    request_latency_seconds: HistogramVec,
    catalog_fallbacks: IntCounter,
    fallback_training_entries: IntCounterVec,
    stale_metrics_discarded: IntCounter,
    predictions_submitted: IntCounter,
    prediction_errors: IntCounterVec,
}

impl WorkbenchMetricsInner {
    fn new() -> Self {
        Self {
            request_latency_seconds: register_histogram_vec!(
                "workbench_request_latency_seconds",
                "Latency of calls to the prediction API",
                &["endpoint"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register request_latency_seconds"),

            catalog_fallbacks: register_int_counter!(
                "workbench_catalog_fallbacks_total",
                "Times the built-in model catalog replaced the remote one"
            )
            .expect("Failed to register catalog_fallbacks"),

            fallback_training_entries: register_int_counter_vec!(
                "workbench_fallback_training_entries_total",
                "Training results synthesized from the fallback table",
                &["variant"]
            )
            .expect("Failed to register fallback_training_entries"),

            stale_metrics_discarded: register_int_counter!(
                "workbench_stale_metrics_discarded_total",
                "Metrics fetches dropped because the selection changed"
            )
            .expect("Failed to register stale_metrics_discarded"),

            predictions_submitted: register_int_counter!(
                "workbench_predictions_submitted_total",
                "Prediction requests sent to the API"
            )
            .expect("Failed to register predictions_submitted"),

            prediction_errors: register_int_counter_vec!(
                "workbench_prediction_errors_total",
                "Failed prediction requests by error kind",
                &["kind"]
            )
            .expect("Failed to register prediction_errors"),
        }
    }
}

/// Workbench metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct WorkbenchMetrics {
    _private: (),
}

impl Default for WorkbenchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbenchMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(WorkbenchMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &WorkbenchMetricsInner {
        GLOBAL_METRICS.get_or_init(WorkbenchMetricsInner::new)
    }

    pub fn observe_request_latency(&self, endpoint: &str, duration_secs: f64) {
        self.inner()
            .request_latency_seconds
            .with_label_values(&[endpoint])
            .observe(duration_secs);
    }

    pub fn inc_catalog_fallbacks(&self) {
        self.inner().catalog_fallbacks.inc();
    }

    pub fn inc_fallback_training_entry(&self, variant: &str) {
        self.inner()
            .fallback_training_entries
            .with_label_values(&[variant])
            .inc();
    }

    pub fn inc_stale_metrics_discarded(&self) {
        self.inner().stale_metrics_discarded.inc();
    }

    pub fn inc_predictions_submitted(&self) {
        self.inner().predictions_submitted.inc();
    }

    pub fn inc_prediction_errors(&self, kind: &str) {
        self.inner()
            .prediction_errors
            .with_label_values(&[kind])
            .inc();
    }

    /// Render every registered metric in the Prometheus text format
    pub fn render(&self) -> String {
        use prometheus::{Encoder, TextEncoder};

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Structured logger for workbench events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str, api_url: &str) {
        info!(
            event = "workbench_started",
            instance = %self.instance,
            version = %version,
            api_url = %api_url,
            "Workbench started"
        );
    }

    pub fn log_catalog_loaded(&self, models: usize, remote: bool) {
        info!(
            event = "catalog_loaded",
            instance = %self.instance,
            models = models,
            remote = remote,
            "Model catalog loaded"
        );
    }

    pub fn log_catalog_fallback(&self, reason: &str) {
        warn!(
            event = "catalog_fallback",
            instance = %self.instance,
            reason = %reason,
            "Using built-in model catalog"
        );
    }

    pub fn log_metrics_reconciled(&self, model_id: &str, fetched: usize, synthesized: usize) {
        info!(
            event = "metrics_reconciled",
            instance = %self.instance,
            model_id = %model_id,
            fetched = fetched,
            synthesized = synthesized,
            "Training metrics reconciled"
        );
    }

    pub fn log_metrics_fallback(&self, model_id: &str, reason: &str) {
        warn!(
            event = "metrics_fallback",
            instance = %self.instance,
            model_id = %model_id,
            reason = %reason,
            "Training metrics unavailable, using fallback table"
        );
    }

    pub fn log_record_dropped(&self, record_name: &str) {
        debug!(
            event = "training_record_dropped",
            instance = %self.instance,
            record_name = %record_name,
            "Training record matches no algorithm variant"
        );
    }

    pub fn log_stale_metrics(&self, model_id: &str, generation: u64, current: u64) {
        info!(
            event = "stale_metrics_discarded",
            instance = %self.instance,
            model_id = %model_id,
            generation = generation,
            current_generation = current,
            "Discarding metrics for a previous selection"
        );
    }

    pub fn log_prediction_submitted(&self, model_id: &str, endpoint: &str, inputs: usize) {
        info!(
            event = "prediction_submitted",
            instance = %self.instance,
            model_id = %model_id,
            endpoint = %endpoint,
            inputs = inputs,
            "Submitting prediction request"
        );
    }

    pub fn log_prediction_failed(&self, model_id: &str, kind: &str, message: &str) {
        warn!(
            event = "prediction_failed",
            instance = %self.instance,
            model_id = %model_id,
            kind = %kind,
            message = %message,
            "Prediction request failed"
        );
    }

    pub fn log_rejected(&self, action: &str, reason: &str) {
        info!(
            event = "action_rejected",
            instance = %self.instance,
            action = %action,
            reason = %reason,
            "Workbench rejected an action"
        );
    }
}
