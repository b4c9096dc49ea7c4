//! Workbench configuration
//!
//! The host application builds one [`WorkbenchConfig`] and hands it to the
//! workbench at construction. Values come from `WORKBENCH_*` environment
//! variables layered over built-in defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Deployed API used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://alumni-server-phe9.onrender.com/api";

/// Upper bound for every remote call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("invalid API URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),
}

/// What to do with a metrics fetch that completes after the selection changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleMetricsPolicy {
    /// Drop results whose generation token no longer matches
    #[default]
    Discard,
    /// Apply whichever fetch resolves last
    ApplyLatest,
}

/// Workbench configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchConfig {
    /// Base URL of the prediction API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token sent with every request when present
    #[serde(default)]
    pub api_token: Option<String>,

    /// Timeout applied to catalog, metrics and prediction calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub stale_metrics: StaleMetricsPolicy,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            stale_metrics: StaleMetricsPolicy::default(),
        }
    }
}

impl WorkbenchConfig {
    /// Load configuration from `WORKBENCH_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("WORKBENCH").try_parsing(true))
            .build()?;

        let mut loaded: Self = config.try_deserialize()?;
        loaded.api_token = loaded.api_token.filter(|t| !t.trim().is_empty());
        Ok(loaded)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_stale_metrics(mut self, policy: StaleMetricsPolicy) -> Self {
        self.stale_metrics = policy;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Parsed base URL, always ending in `/` so endpoint paths join under it
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let trimmed = self.api_url.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{}/", trimmed)
        };
        Url::parse(&with_slash).map_err(|source| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            source,
        })
    }
}
