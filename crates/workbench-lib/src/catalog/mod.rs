//! Model catalog
//!
//! Loads model descriptors from the backend and attaches the input schema
//! for each known model name. Any failure or an empty answer yields the
//! built-in catalog, so callers always get something usable.

mod schema;

pub use schema::{builtin_models, schema_for, CAREER_PATH_NAME, EMPLOYMENT_PROBABILITY_NAME};

use crate::api::{ModelApi, ModelDescriptor};
use crate::models::Model;
use crate::observability::{StructuredLogger, WorkbenchMetrics};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Where the catalog's models came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Remote,
    BuiltIn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    models: Vec<Model>,
    source: CatalogSource,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            models: builtin_models(),
            source: CatalogSource::BuiltIn,
        }
    }

    /// Build a catalog from backend descriptors, attaching schemas by name
    pub fn from_descriptors(descriptors: Vec<ModelDescriptor>) -> Self {
        let models = descriptors
            .into_iter()
            .map(|d| {
                let inputs = schema_for(&d.name);
                Model::new(d.name, d.description, d.accuracy, inputs)
            })
            .collect();
        Self {
            models,
            source: CatalogSource::Remote,
        }
    }

    /// Fetch the catalog, falling back to the built-in models
    pub async fn load(
        api: &dyn ModelApi,
        timeout: Duration,
        logger: &StructuredLogger,
        metrics: &WorkbenchMetrics,
    ) -> Self {
        let started = Instant::now();
        let fetched = tokio::time::timeout(timeout, api.list_models()).await;
        metrics.observe_request_latency(crate::api::MODELS_PATH, started.elapsed().as_secs_f64());

        let catalog = match fetched {
            Ok(Ok(descriptors)) if !descriptors.is_empty() => Self::from_descriptors(descriptors),
            Ok(Ok(_)) => {
                logger.log_catalog_fallback("backend returned no models");
                metrics.inc_catalog_fallbacks();
                Self::builtin()
            }
            Ok(Err(e)) => {
                logger.log_catalog_fallback(&e.to_string());
                metrics.inc_catalog_fallbacks();
                Self::builtin()
            }
            Err(_) => {
                logger.log_catalog_fallback("timed out");
                metrics.inc_catalog_fallbacks();
                Self::builtin()
            }
        };

        logger.log_catalog_loaded(catalog.len(), catalog.source == CatalogSource::Remote);
        catalog
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Find a model by its slug id
    pub fn find(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }
}
