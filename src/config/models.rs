//! Configuration data structures for vision-relay.
//!
//! This module defines the schema for the application settings: the HTTP
//! server, the two upstream providers (Anthropic and Gemini), the two
//! pipelines built on top of them, and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, workers, body limit).
    #[serde(default)]
    pub server: ServerConfig,

    /// Anthropic Messages API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Gemini generateContent API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Food photo analysis pipeline (`POST /analyze`).
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Portrait generation pipeline (`POST /generate`).
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8000`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of tokio worker threads.
    /// Default: Number of logical CPU cores.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Hard ceiling on request bodies, enforced before multipart parsing.
    /// Must stay above the pipeline upload limits so oversize files reach
    /// the validator and get a proper message.
    /// Default: 64 MiB
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Whether to gzip responses (generated images are large base64 blobs).
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enable_compression: bool,

    /// Allow cross-origin requests from any origin.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

/// Settings for the Anthropic Messages API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key. Normally supplied through `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default: `https://api.anthropic.com`
    #[serde(default = "default_anthropic_base_url")]
    pub api_base_url: String,

    /// Value of the `anthropic-version` header.
    #[serde(default = "default_anthropic_version")]
    pub api_version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Settings for the Gemini generateContent API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key. Normally supplied through `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default: `https://generativelanguage.googleapis.com/v1beta`
    #[serde(default = "default_gemini_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Which upstream API a pipeline talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Whether the provider can answer with inline image parts.
    pub fn supports_image_output(&self) -> bool {
        matches!(self, ProviderKind::Gemini)
    }
}

/// Which food-analysis prompt wording to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisTemplate {
    /// Step-by-step analysis followed by the structured answer.
    Detailed,
    /// Same output sections, shorter instructions.
    Brief,
}

/// How `/analyze` reports failures over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatusPolicy {
    /// 400 / 503 / 500, same as `/generate`.
    StatusCodes,
    /// Always 200; the failure is only visible in the `error` field.
    AlwaysOk,
}

/// Settings for the food photo analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Default: `anthropic`
    #[serde(default = "default_analysis_provider")]
    pub provider: ProviderKind,

    /// Default: `claude-3-5-haiku-20241022`
    #[serde(default = "default_analysis_model")]
    pub model: String,

    /// Default: `detailed`
    #[serde(default = "default_analysis_template")]
    pub template: AnalysisTemplate,

    /// Default: `1000`
    #[serde(default = "default_analysis_max_tokens")]
    pub max_tokens: u32,

    /// Default: 20 MiB
    #[serde(default = "default_analysis_max_upload")]
    pub max_upload_bytes: usize,

    /// Default: `image/jpeg`, `image/png`
    #[serde(default = "default_analysis_mime_types")]
    pub allowed_mime_types: Vec<String>,

    /// Default: `status_codes`
    #[serde(default = "default_error_status")]
    pub error_status: ErrorStatusPolicy,
}

/// Settings for the studio portrait generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Default: `gemini`
    #[serde(default = "default_generation_provider")]
    pub provider: ProviderKind,

    /// Default: `gemini-2.5-flash-image`
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Default: `8192`
    #[serde(default = "default_generation_max_tokens")]
    pub max_tokens: u32,

    /// Default: 10 MiB
    #[serde(default = "default_generation_max_upload")]
    pub max_upload_bytes: usize,

    /// Default: `image/jpeg`, `image/png`, `image/webp`
    #[serde(default = "default_generation_mime_types")]
    pub allowed_mime_types: Vec<String>,

    /// Message returned when the model sends an image without any text.
    #[serde(default = "default_generation_message")]
    pub default_message: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            max_body_bytes: default_max_body_bytes(),
            enable_compression: true,
            cors_permissive: true,
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_anthropic_base_url(),
            api_version: default_anthropic_version(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_gemini_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: default_analysis_provider(),
            model: default_analysis_model(),
            template: default_analysis_template(),
            max_tokens: default_analysis_max_tokens(),
            max_upload_bytes: default_analysis_max_upload(),
            allowed_mime_types: default_analysis_mime_types(),
            error_status: default_error_status(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            model: default_generation_model(),
            max_tokens: default_generation_max_tokens(),
            max_upload_bytes: default_generation_max_upload(),
            allowed_mime_types: default_generation_mime_types(),
            default_message: default_generation_message(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_analysis_provider() -> ProviderKind {
    ProviderKind::Anthropic
}

fn default_analysis_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_analysis_template() -> AnalysisTemplate {
    AnalysisTemplate::Detailed
}

fn default_analysis_max_tokens() -> u32 {
    1000
}

fn default_analysis_max_upload() -> usize {
    20 * 1024 * 1024
}

fn default_analysis_mime_types() -> Vec<String> {
    vec!["image/jpeg".to_string(), "image/png".to_string()]
}

fn default_error_status() -> ErrorStatusPolicy {
    ErrorStatusPolicy::StatusCodes
}

fn default_generation_provider() -> ProviderKind {
    ProviderKind::Gemini
}

fn default_generation_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_generation_max_tokens() -> u32 {
    8192
}

fn default_generation_max_upload() -> usize {
    10 * 1024 * 1024
}

fn default_generation_mime_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/webp".to_string(),
    ]
}

fn default_generation_message() -> String {
    "Studiový portrét byl úspěšně vygenerován.".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
