//! Anthropic Messages API type definitions.
//!
//! Only the subset needed for a single-turn vision request: one user message
//! holding a text block and a base64 image block, and a response whose text
//! blocks are read back.

// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Anthropic Messages API request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    /// The model that will complete your prompt.
    pub model: String,

    /// The maximum number of tokens to generate before stopping.
    pub max_tokens: u32,

    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Input messages.
    pub messages: Vec<Message>,
}

/// A single message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender ("user" or "assistant").
    pub role: String,
    pub content: Vec<ContentBlock>,
}

/// Content block types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block.
    Text { text: String },
    /// An image content block.
    Image { source: ImageSource },
    /// Block types this relay never asks for (tool_use, thinking, ...).
    #[serde(other)]
    Unsupported,
}

/// Image source for vision content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    #[serde(rename = "base64")]
    Base64 { media_type: String, data: String },
}

/// Anthropic Messages API response.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub id: Option<String>,

    /// Content generated by the model.
    #[serde(default)]
    pub content: Vec<ContentBlock>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub stop_reason: Option<String>,

    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// Error body: `{"type": "error", "error": {"type": "...", "message": "..."}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let req = MessagesRequest {
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 1000,
            system: Some("Jsi expert.".to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Text { text: "popis".to_string() },
                    ContentBlock::Image {
                        source: ImageSource::Base64 {
                            media_type: "image/png".to_string(),
                            data: "AAAA".to_string(),
                        },
                    },
                ],
            }],
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
        assert_eq!(value["messages"][0]["content"][1]["type"], "image");
        assert_eq!(value["messages"][0]["content"][1]["source"]["type"], "base64");
        assert_eq!(value["messages"][0]["content"][1]["source"]["media_type"], "image/png");
    }

    #[test]
    fn test_response_ignores_unknown_blocks() {
        let body = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-haiku-20241022",
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "Název jídla:\nSvíčková"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 20}
        });

        let resp: MessagesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.content.len(), 2);
        assert_eq!(resp.content[0], ContentBlock::Unsupported);
        assert_eq!(
            resp.content[1],
            ContentBlock::Text { text: "Název jídla:\nSvíčková".to_string() }
        );
    }
}
