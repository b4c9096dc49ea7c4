//! Resolving settings and opening a workbench

use anyhow::{anyhow, Context, Result};
use workbench_lib::{models::slugify, Catalog, Model, StructuredLogger, Workbench, WorkbenchConfig};

use crate::config::Config;
use crate::output::OutputFormat;

/// Effective settings after merging flags, environment, file and defaults
#[derive(Debug, Clone)]
pub struct Settings {
    pub workbench: WorkbenchConfig,
    pub format: OutputFormat,
}

/// Merge settings. `api_url`, `api_token` and `format` already carry the
/// flag or environment value when one was given.
pub fn resolve(
    base: WorkbenchConfig,
    file: &Config,
    api_url: Option<String>,
    api_token: Option<String>,
    format: Option<OutputFormat>,
) -> Settings {
    let mut workbench = base;
    if let Some(url) = api_url.or_else(|| file.api_url.clone()) {
        workbench = workbench.with_api_url(url);
    }
    let token = api_token
        .or_else(|| file.api_token.clone())
        .filter(|t| !t.trim().is_empty());
    if token.is_some() {
        workbench = workbench.with_api_token(token);
    }

    let format = format
        .or_else(|| {
            file.default_format
                .as_deref()
                .and_then(OutputFormat::from_name)
        })
        .unwrap_or_default();

    Settings { workbench, format }
}

/// Connect to the backend and load the catalog
pub async fn open(config: WorkbenchConfig, seed: Option<u64>) -> Result<Workbench> {
    let logger = StructuredLogger::new("mwb");
    logger.log_startup(env!("CARGO_PKG_VERSION"), &config.api_url);

    let mut workbench = Workbench::connect(config).context("Failed to set up API client")?;
    if let Some(seed) = seed {
        workbench = workbench.with_seed(seed);
    }
    workbench.load_catalog().await;
    Ok(workbench)
}

/// Find a model by id, by name, or by the slug of the given text
pub fn find_model<'a>(catalog: &'a Catalog, query: &str) -> Result<&'a Model> {
    let slug = slugify(query.trim());
    catalog
        .find(query)
        .or_else(|| catalog.models().iter().find(|m| m.name.eq_ignore_ascii_case(query)))
        .or_else(|| catalog.find(&slug))
        .ok_or_else(|| {
            let known: Vec<&str> = catalog.models().iter().map(|m| m.id.as_str()).collect();
            anyhow!("Unknown model '{}'. Available: {}", query, known.join(", "))
        })
}
