//! Wire transport for `generateContent` calls.
//!
//! The client talks to the service through [`GenerativeTransport`] so the
//! exchange can be swapped out. [`HttpTransport`] is the real thing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;

use super::config::AssistantConfig;
use super::errors::AssistantError;
use super::types::{GenerateRequest, GenerateResponse};

/// One request in, one response out. No retries, no caching.
#[async_trait]
pub trait GenerativeTransport: Send + Sync {
    /// Where requests go, for logs.
    fn endpoint(&self) -> &str;

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AssistantError>;
}

// ─── HttpTransport ───────────────────────────────────────────────────────────

/// `reqwest`-backed transport for the Generative Language REST API.
pub struct HttpTransport {
    http: HttpClient,
    url: String,
}

impl HttpTransport {
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let url = generate_url(&config.base_url, &config.model);

        let mut builder = HttpClient::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| AssistantError::ConnectionFailed {
            endpoint: url.clone(),
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self { http, url })
    }
}

/// `{base_url}/models/{model}:generateContent`.
fn generate_url(base_url: &str, model: &str) -> String {
    format!("{}/models/{model}:generateContent", base_url.trim_end_matches('/'))
}

#[async_trait]
impl GenerativeTransport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AssistantError> {
        // Metadata only; prompts may carry patient data.
        tracing::debug!(
            url = %self.url,
            content_count = request.contents.len(),
            has_system_instruction = request.system_instruction.is_some(),
            structured = request.generation_config.is_some(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantError::ConnectionFailed {
                endpoint: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::MalformedResponse {
                reason: format!("failed to read response body: {e}"),
            })?;

        serde_json::from_str(&body).map_err(|e| AssistantError::MalformedResponse {
            reason: format!("failed to parse generateContent response: {e}"),
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
