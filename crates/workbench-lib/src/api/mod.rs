//! Remote prediction API contract
//!
//! This module provides:
//! - The [`ModelApi`] trait, the seam between the workbench and the backend
//! - Wire types for the catalog, training-metrics and prediction endpoints
//! - An HTTP implementation on top of reqwest

mod error;
mod http;

pub use error::ApiError;
pub use http::HttpModelApi;

use crate::models::InputValues;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub const MODELS_PATH: &str = "prediction/models";
pub const TRAINING_RESULTS_PATH: &str = "prediction/training-results";

/// Trait for prediction backends
#[async_trait]
pub trait ModelApi: Send + Sync {
    /// List the model descriptors published by the backend
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError>;

    /// Fetch every stored training record
    async fn training_results(&self) -> Result<Vec<TrainingRecord>, ApiError>;

    /// Run a model behind `prediction/<endpoint>`
    async fn run_prediction(
        &self,
        endpoint: &str,
        inputs: &InputValues,
    ) -> Result<PredictionPayload, ApiError>;
}

/// Model entry as returned by `GET prediction/models`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accuracy: f64,
}

/// Training record as returned by `GET prediction/training-results`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingRecord {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accuracy: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precision: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recall: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub f1: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_importance: BTreeMap<String, f64>,
    #[serde(default)]
    pub num_samples: Option<u64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of a successful prediction call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionPayload {
    Classification(ClassificationOutput),
    Probability(ProbabilityOutput),
}

impl PredictionPayload {
    pub fn model_accuracy(&self) -> Option<f64> {
        match self {
            Self::Classification(c) => c.model_accuracy,
            Self::Probability(p) => p.model_accuracy,
        }
    }

    pub fn model_confidence(&self) -> Option<f64> {
        match self {
            Self::Classification(c) => c.model_confidence,
            Self::Probability(p) => p.model_confidence,
        }
    }
}

/// Ranked labels with probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutput {
    pub predictions: Vec<LabelPrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPrediction {
    #[serde(alias = "career")]
    pub label: String,
    pub probability: f64,
}

/// Single likelihood with contributing factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityOutput {
    pub probability: f64,
    #[serde(default)]
    pub factors: Vec<Factor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(other)]
    Unknown,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }
}

/// Read an explicit `null` as the field's default, like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode array items one at a time; items that do not fit are logged and
/// skipped so the rest survive
pub(crate) fn decode_each<T: DeserializeOwned>(items: Vec<Value>, kind: &str) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(kind = %kind, index, error = %e, "Skipping undecodable record");
                None
            }
        })
        .collect()
}
