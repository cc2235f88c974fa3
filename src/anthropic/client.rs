// Anthropic Messages API client
// Author: kelexine (https://github.com/kelexine)

use crate::config::AnthropicConfig;
use crate::error::{RelayError, Result};
use crate::models::anthropic::{
    ContentBlock, ErrorResponse, ImageSource, Message, MessagesRequest, MessagesResponse,
};
use crate::provider::{Provider, ProviderRequest, ProviderResponse, ResponsePart};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};
use zeroize::Zeroizing;

/// Client for the Anthropic Messages API.
///
/// Holds a pooled HTTP client and the API key. Built once at startup and
/// shared read-only across requests.
pub struct AnthropicClient {
    http_client: Client,
    api_key: Zeroizing<String>,
    base_url: String,
    api_version: String,
}

impl AnthropicClient {
    /// Create a client from configuration.
    ///
    /// Fails with [`RelayError::Configuration`] if no API key is set.
    pub fn new(config: &AnthropicConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                RelayError::Configuration("ANTHROPIC_API_KEY is not set".to_string())
            })?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .use_rustls_tls()
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created Anthropic client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            api_key: Zeroizing::new(api_key),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }

    /// Whether the key looks like an Anthropic key (`sk-ant-...`).
    pub fn key_looks_valid(key: &str) -> bool {
        key.starts_with("sk-ant-")
    }

    fn build_request(request: ProviderRequest) -> MessagesRequest {
        MessagesRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            system: Some(request.system).filter(|s| !s.is_empty()),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Text {
                        text: request.prompt,
                    },
                    ContentBlock::Image {
                        source: ImageSource::Base64 {
                            media_type: request.image.mime_type,
                            data: request.image.data,
                        },
                    },
                ],
            }],
        }
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        serde_json::from_str::<ErrorResponse>(response_text)
            .ok()
            .map(|e| format!("{}: {}", e.error.error_type, e.error.message))
    }
}

#[async_trait]
impl Provider for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        let url = format!("{}/v1/messages", self.base_url);
        let model = request.model.clone();
        let body = Self::build_request(request);

        debug!("Calling Anthropic messages API for model: {}", model);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", self.api_key.as_str())
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Provider(format!("HTTP error: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| RelayError::Provider(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let error_msg =
                Self::extract_error_message(&response_text).unwrap_or_else(|| response_text.clone());
            error!(
                "Anthropic API error: HTTP {} - {}",
                status,
                sanitize(&error_msg)
            );
            return Err(match status.as_u16() {
                401 | 403 => RelayError::Configuration(format!(
                    "Anthropic rejected the API key: {}",
                    error_msg
                )),
                _ => RelayError::Provider(format!("HTTP {}: {}", status, error_msg)),
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Anthropic response: {}", e);
            RelayError::Provider(format!("Response parsing error: {}", e))
        })?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "Anthropic usage: input={} output={} stop_reason={:?}",
                usage.input_tokens, usage.output_tokens, parsed.stop_reason
            );
        }

        let parts = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(ResponsePart::Text(text)),
                _ => None,
            })
            .collect();

        Ok(ProviderResponse { parts })
    }
}
