//! Model exploration and prediction workbench
//!
//! This crate provides the core functionality for:
//! - Loading the model catalog and its input schemas
//! - Reconciling per-algorithm training metrics with fallback synthesis
//! - Generating schema-valid sample inputs
//! - Submitting predictions and classifying failures
//! - Presenting results for display

pub mod api;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod models;
pub mod observability;
pub mod prediction;
pub mod presenter;
pub mod sample;
pub mod workbench;

pub use api::{ApiError, HttpModelApi, ModelApi};
pub use catalog::{Catalog, CatalogSource};
pub use config::{ConfigError, StaleMetricsPolicy, WorkbenchConfig};
pub use metrics::{AlgorithmVariant, TrainingMetricsCache, TrainingResultSet};
pub use models::*;
pub use observability::{StructuredLogger, WorkbenchMetrics};
pub use prediction::{PredictError, PredictionClient, PredictionResult};
pub use sample::generate_sample;
pub use workbench::{Effect, Event, Rejection, Workbench, WorkbenchState};
