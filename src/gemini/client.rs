// Gemini API client
// Author: kelexine (https://github.com/kelexine)

use crate::config::GeminiConfig;
use crate::error::{RelayError, Result};
use crate::models::gemini::{
    Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, SystemInstruction,
};
use crate::provider::{Provider, ProviderRequest, ProviderResponse, ResponsePart};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};
use zeroize::Zeroizing;

/// Client for the Google Gemini `generateContent` API.
///
/// Authenticates with an API key sent in the `x-goog-api-key` header.
/// Used both for plain vision analysis and for image generation models
/// that answer with inline image parts.
pub struct GeminiClient {
    http_client: Client,
    api_key: Zeroizing<String>,
    base_url: String,
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// Fails with [`RelayError::Configuration`] if no API key is set.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| RelayError::Configuration("GEMINI_API_KEY is not set".to_string()))?;

        // Image generation can take a while; rely on the configured timeout
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .use_rustls_tls()
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created Gemini client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            api_key: Zeroizing::new(api_key),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_request(request: ProviderRequest) -> GenerateContentRequest {
        let response_modalities = request
            .wants_image
            .then(|| vec!["TEXT".to_string(), "IMAGE".to_string()]);

        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::text(request.prompt),
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type,
                            data: request.image.data,
                        },
                    },
                ],
            }],
            system_instruction: Some(request.system)
                .filter(|s| !s.is_empty())
                .map(|s| SystemInstruction {
                    parts: vec![Part::text(s)],
                }),
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(request.max_tokens).filter(|t| *t > 0),
                response_modalities,
            }),
        }
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        let error = serde_json::from_str::<ErrorResponse>(response_text).ok()?.error;
        error.message.or(error.status)
    }

    /// Reduce the first candidate to provider-neutral parts. Reasoning
    /// ("thought") text is dropped.
    fn into_parts(response: GenerateContentResponse) -> Vec<ResponsePart> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            warn!(
                "Gemini returned no candidates (prompt feedback: {:?})",
                response.prompt_feedback
            );
            return Vec::new();
        };

        debug!("Gemini finish_reason: {:?}", candidate.finish_reason);

        candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| match part {
                Part::Text { thought: Some(true), .. } => None,
                Part::Text { text, .. } => Some(ResponsePart::Text(text)),
                Part::InlineData { inline_data } => Some(ResponsePart::InlineData {
                    mime_type: inline_data.mime_type,
                    data: inline_data.data,
                }),
                Part::Other(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Provider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = Self::build_request(request);

        debug!("Calling generateContent API: {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .header("Content-Type", "application/json")
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
            error!("Gemini API error: HTTP {} - {}", status, sanitize(&error_msg));

            // Gemini reports a bad key as 400 INVALID_ARGUMENT
            let bad_key = status.as_u16() == 400 && error_msg.contains("API key");
            return Err(match status.as_u16() {
                401 | 403 => RelayError::Configuration(format!(
                    "Gemini rejected the API key: {}",
                    error_msg
                )),
                _ if bad_key => RelayError::Configuration(error_msg),
                _ => RelayError::Provider(format!("HTTP {}: {}", status, error_msg)),
            });
        }

        debug!(
            "Raw Gemini response (first 300 chars): {}",
            response_text.chars().take(300).collect::<String>()
        );

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            RelayError::Provider(format!("Response parsing error: {}", e))
        })?;

        Ok(ProviderResponse {
            parts: Self::into_parts(parsed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ImagePart;
    use serde_json::json;

    fn request(wants_image: bool) -> ProviderRequest {
        ProviderRequest {
            model: "gemini-2.5-flash-image".to_string(),
            system: "Jsi profesionální fotograf.".to_string(),
            prompt: "Vytvoř studiový portrét".to_string(),
            image: ImagePart {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            },
            max_tokens: 0,
            wants_image,
        }
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        assert!(matches!(
            GeminiClient::new(&GeminiConfig::default()),
            Err(RelayError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_request_modalities() {
        let with_image = serde_json::to_value(GeminiClient::build_request(request(true))).unwrap();
        assert_eq!(with_image["generationConfig"]["responseModalities"], json!(["TEXT", "IMAGE"]));

        let text_only = serde_json::to_value(GeminiClient::build_request(request(false))).unwrap();
        assert!(text_only["generationConfig"].get("responseModalities").is_none());
    }

    #[test]
    fn test_thought_parts_are_dropped() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "planning...", "thought": true},
                    {"text": "Tady je portrét"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBO"}}
                ]}
            }]
        }))
        .unwrap();

        let parts = GeminiClient::into_parts(response);
        assert_eq!(
            parts,
            vec![
                ResponsePart::Text("Tady je portrét".to_string()),
                ResponsePart::InlineData {
                    mime_type: "image/png".to_string(),
                    data: "iVBO".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_no_candidates_yields_no_parts() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(GeminiClient::into_parts(response).is_empty());
    }
}
