//! Prediction submission and failure classification

use crate::api::{ApiError, ModelApi, PredictionPayload};
use crate::models::{InputValues, Model};
use crate::observability::{StructuredLogger, WorkbenchMetrics};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Message shown when the backend never answered
pub const NO_RESPONSE_MESSAGE: &str =
    "No response from server. The server might be starting up. Please try again in a minute.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// The backend answered with an error status or an unusable body
    #[error("Server error: {status_code} - {message}")]
    RemoteRejected { status_code: u16, message: String },

    /// The request went out but no response arrived in time
    #[error("{}", NO_RESPONSE_MESSAGE)]
    NoResponse,

    /// The request could not be built or sent
    #[error("Error: {message}")]
    RequestSetupFailure { message: String },
}

impl PredictError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RemoteRejected { .. } => "remote_rejected",
            Self::NoResponse => "no_response",
            Self::RequestSetupFailure { .. } => "request_setup_failure",
        }
    }
}

impl From<ApiError> for PredictError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } | ApiError::Decode { status, message } => {
                Self::RemoteRejected {
                    status_code: status,
                    message,
                }
            }
            ApiError::NoResponse(_) => Self::NoResponse,
            ApiError::Setup(message) => Self::RequestSetupFailure { message },
        }
    }
}

/// A normalized prediction response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    #[serde(flatten)]
    pub payload: PredictionPayload,
    pub from_remote: bool,
}

impl PredictionResult {
    pub fn remote(payload: PredictionPayload) -> Self {
        Self {
            payload,
            from_remote: true,
        }
    }
}

/// Backend endpoint serving a model
pub fn endpoint_for(model_id: &str) -> &str {
    match model_id {
        "career-path-prediction" => "career-path-prediction",
        "employment-probability-post-graduation" => "employment-probability",
        other => other,
    }
}

/// Submits predictions, allowing at most one in flight
pub struct PredictionClient {
    api: Arc<dyn ModelApi>,
    timeout: Duration,
    busy: AtomicBool,
    logger: StructuredLogger,
    metrics: WorkbenchMetrics,
}

/// Clears the busy flag when the request finishes, however it finishes
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PredictionClient {
    pub fn new(
        api: Arc<dyn ModelApi>,
        timeout: Duration,
        logger: StructuredLogger,
        metrics: WorkbenchMetrics,
    ) -> Self {
        Self {
            api,
            timeout,
            busy: AtomicBool::new(false),
            logger,
            metrics,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Submit `inputs` for `model`. A call made while another is pending is
    /// refused without touching the network.
    pub async fn predict(
        &self,
        model: &Model,
        inputs: &InputValues,
    ) -> Result<PredictionResult, PredictError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.logger
                .log_rejected("predict", "a prediction is already in progress");
            return Err(PredictError::RequestSetupFailure {
                message: "a prediction is already in progress".to_string(),
            });
        }
        let _in_flight = InFlight(&self.busy);

        let endpoint = endpoint_for(&model.id);
        self.logger
            .log_prediction_submitted(&model.id, endpoint, inputs.len());
        self.metrics.inc_predictions_submitted();

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.api.run_prediction(endpoint, inputs))
            .await;
        self.metrics.observe_request_latency(
            &format!("prediction/{}", endpoint),
            started.elapsed().as_secs_f64(),
        );

        let result = match outcome {
            Ok(Ok(payload)) => Ok(PredictionResult::remote(payload)),
            Ok(Err(e)) => Err(PredictError::from(e)),
            Err(_) => Err(PredictError::NoResponse),
        };

        if let Err(e) = &result {
            self.metrics.inc_prediction_errors(e.kind());
            self.logger
                .log_prediction_failed(&model.id, e.kind(), &e.to_string());
        }
        result
    }
}
