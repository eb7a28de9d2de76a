use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{
    AppSettings, HealthResponse, MessageResponse, Tool, ToolRequest, ToolResponse,
};

/// Thin wrapper over the REST API. `base_url` includes the `/api` prefix,
/// e.g. `http://localhost:8080/api`. No retries, no backoff, no auth.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>> {
        self.get_json(&format!("{}/tools", self.base_url)).await
    }

    pub async fn get_tool(&self, tool_id: &str) -> Result<Tool> {
        self.get_json(&format!("{}/tools/{}", self.base_url, tool_id))
            .await
    }

    pub async fn process_tool(&self, tool_id: &str, request: &ToolRequest) -> Result<ToolResponse> {
        let url = format!("{}/tools/{}/process", self.base_url, tool_id);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to send request")?;
        parse_response(response).await
    }

    pub async fn get_settings(&self) -> Result<AppSettings> {
        self.get_json(&format!("{}/settings", self.base_url)).await
    }

    pub async fn update_settings(&self, settings: &AppSettings) -> Result<MessageResponse> {
        let url = format!("{}/settings", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(settings)
            .send()
            .await
            .context("Failed to send request")?;
        parse_response(response).await
    }

    /// The health endpoint lives outside the `/api` prefix.
    pub async fn health(&self) -> Result<HealthResponse> {
        let root = self.base_url.trim_end_matches("/api");
        self.get_json(&format!("{}/health", root)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;
        parse_response(response).await
    }
}

/// Non-2xx responses become a single error message: the JSON body's `error`
/// field when present, the HTTP status line otherwise.
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let fallback = format!("HTTP {}", status);
        let message = match response.json::<Value>().await {
            Ok(body) => body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(fallback),
            Err(_) => fallback,
        };
        anyhow::bail!(message);
    }

    response.json().await.context("Failed to parse response")
}
