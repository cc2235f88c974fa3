//! Provider-neutral request and response shapes.
//!
//! A pipeline builds one [`ProviderRequest`] per upload and hands it to a
//! [`Provider`]. The Anthropic and Gemini clients translate it into their own
//! wire formats and reduce whatever comes back to a flat list of
//! [`ResponsePart`]s.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::anthropic::AnthropicClient;
use crate::config::{AppConfig, ProviderKind};
use crate::error::Result;
use crate::gemini::GeminiClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Image carried as a typed request part, never inlined into prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub mime_type: String,
    /// Standard base64, no `data:` prefix.
    pub data: String,
}

/// Everything a provider needs for a single call.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    /// Role priming sent as the system instruction.
    pub system: String,
    /// Rendered prompt text.
    pub prompt: String,
    pub image: ImagePart,
    pub max_tokens: u32,
    /// Ask for image output in addition to text.
    pub wants_image: bool,
}

/// One unit of provider output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub parts: Vec<ResponsePart>,
}

impl ProviderResponse {
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            ResponsePart::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn first_inline_data(&self) -> Option<(&str, &str)> {
        self.parts.iter().find_map(|part| match part {
            ResponsePart::InlineData { mime_type, data } => Some((mime_type.as_str(), data.as_str())),
            _ => None,
        })
    }
}

/// An upstream multimodal model API.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable name for logs and metrics ("anthropic", "gemini").
    fn name(&self) -> &'static str;

    /// Perform exactly one upstream call. No retries.
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse>;
}

/// Build the client for `kind` once at startup.
///
/// A missing key is not fatal: it is logged here and the pipelines using
/// this provider answer with a configuration error at request time.
pub fn build_provider(kind: ProviderKind, config: &AppConfig) -> Option<Arc<dyn Provider>> {
    let built: Result<Arc<dyn Provider>> = match kind {
        ProviderKind::Anthropic => {
            if let Some(key) = config.anthropic.api_key.as_deref() {
                if !AnthropicClient::key_looks_valid(key) {
                    warn!("ANTHROPIC_API_KEY does not have the expected sk-ant- format");
                }
            }
            AnthropicClient::new(&config.anthropic).map(|c| Arc::new(c) as Arc<dyn Provider>)
        }
        ProviderKind::Gemini => {
            GeminiClient::new(&config.gemini).map(|c| Arc::new(c) as Arc<dyn Provider>)
        }
    };

    match built {
        Ok(provider) => {
            info!("Provider {} ready", kind.as_str());
            Some(provider)
        }
        Err(e) => {
            warn!("Provider {} unavailable: {}", kind.as_str(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_parts_skip_other_kinds() {
        let response = ProviderResponse {
            parts: vec![
                ResponsePart::InlineData {
                    mime_type: "image/png".to_string(),
                    data: "AAAA".to_string(),
                },
                ResponsePart::Text("first".to_string()),
                ResponsePart::Text("second".to_string()),
            ],
        };

        assert_eq!(response.first_text(), Some("first"));
        assert_eq!(response.first_inline_data(), Some(("image/png", "AAAA")));
    }

    #[test]
    fn test_empty_response() {
        let response = ProviderResponse::default();
        assert!(response.first_text().is_none());
        assert!(response.first_inline_data().is_none());
    }
}
