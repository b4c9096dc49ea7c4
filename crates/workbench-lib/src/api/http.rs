//! HTTP client for the prediction API

use super::{
    decode_each, ApiError, ModelApi, ModelDescriptor, PredictionPayload, TrainingRecord,
    MODELS_PATH, TRAINING_RESULTS_PATH,
};
use crate::config::{ConfigError, WorkbenchConfig};
use crate::models::InputValues;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// reqwest-backed implementation of [`ModelApi`]
pub struct HttpModelApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpModelApi {
    /// Create a new API client from the workbench configuration
    pub fn new(config: &WorkbenchConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let path = path.trim_start_matches('/');
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Setup(format!("invalid path {:?}: {}", path, e)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "GET");

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        Self::decode(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &InputValues,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, fields = body.len(), "POST");

        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_rejection(status.as_u16(), &body));
        }

        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            status: status.as_u16(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ModelApi for HttpModelApi {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError> {
        let items: Vec<serde_json::Value> = self.get(MODELS_PATH).await?;
        Ok(decode_each(items, "model_descriptor"))
    }

    async fn training_results(&self) -> Result<Vec<TrainingRecord>, ApiError> {
        let items: Vec<serde_json::Value> = self.get(TRAINING_RESULTS_PATH).await?;
        Ok(decode_each(items, "training_record"))
    }

    async fn run_prediction(
        &self,
        endpoint: &str,
        inputs: &InputValues,
    ) -> Result<PredictionPayload, ApiError> {
        self.post(&format!("prediction/{}", endpoint), inputs).await
    }
}
