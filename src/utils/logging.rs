//! Structured logging and secret redaction.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides [`sanitize`], used wherever upstream error bodies are logged so
//! API keys echoed back by a provider never reach the log sink.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{RelayError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Multi-line, colorized output for development.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };

    result.map_err(|e| RelayError::Internal(format!("Failed to initialize logging: {}", e)))
}

/// Key prefixes that must never be logged, with their replacement.
const SECRET_PATTERNS: [(&str, &str); 2] = [
    // Anthropic API keys
    ("sk-ant-", "[REDACTED_ANTHROPIC_KEY]"),
    // Google API keys
    ("AIza", "[REDACTED_GOOGLE_KEY]"),
];

/// Replaces every detected API key in `input` with a placeholder.
///
/// A key runs from its prefix to the next whitespace, quote or comma.
pub fn sanitize(input: &str) -> String {
    let mut result = input.to_string();

    for (prefix, placeholder) in SECRET_PATTERNS {
        let mut search_from = 0;
        while let Some(offset) = result[search_from..].find(prefix) {
            let start = search_from + offset;
            let end = result[start..]
                .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
                .map(|i| start + i)
                .unwrap_or(result.len());
            result.replace_range(start..end, placeholder);
            search_from = start + placeholder.len();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_anthropic_key() {
        let input = "invalid x-api-key: sk-ant-api03-AbC123_def";
        let output = sanitize(input);
        assert!(output.contains("[REDACTED_ANTHROPIC_KEY]"));
        assert!(!output.contains("AbC123_def"));
    }

    #[test]
    fn test_sanitize_google_key_in_json() {
        let input = r#"{"message":"API key not valid: AIzaSyD-123456","status":"INVALID_ARGUMENT"}"#;
        let output = sanitize(input);
        assert!(output.contains("[REDACTED_GOOGLE_KEY]"));
        assert!(!output.contains("AIzaSyD-123456"));
        assert!(output.contains("INVALID_ARGUMENT"));
    }

    #[test]
    fn test_sanitize_multiple_occurrences() {
        let output = sanitize("sk-ant-one and sk-ant-two");
        assert_eq!(output, "[REDACTED_ANTHROPIC_KEY] and [REDACTED_ANTHROPIC_KEY]");
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize("HTTP 500: overloaded"), "HTTP 500: overloaded");
    }
}
