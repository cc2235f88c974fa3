// Error types for vision-relay
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Client-visible text for a missing or rejected provider key.
pub const CONFIGURATION_MESSAGE: &str =
    "Služba není správně nakonfigurována. Chybí nebo je neplatný API klíč.";

/// Client-visible text when the generation model returned no image.
pub const MISSING_IMAGE_MESSAGE: &str =
    "Model nevygeneroval žádný obrázek. Zkuste to prosím znovu.";

/// Generic client-visible text for unexpected failures.
pub const INTERNAL_MESSAGE: &str = "Došlo k neočekávané chybě při zpracování požadavku.";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider returned no image part")]
    MissingImage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) | RelayError::Decode(_) => StatusCode::BAD_REQUEST,
            RelayError::Configuration(_) | RelayError::MissingImage => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation",
            RelayError::Decode(_) => "decode",
            RelayError::Configuration(_) | RelayError::ConfigParsing(_) => "configuration",
            RelayError::Provider(_) | RelayError::Http(_) => "provider",
            RelayError::MissingImage => "missing_image",
            _ => "internal",
        }
    }

    /// Message that is safe to show to the HTTP caller.
    ///
    /// Validation and decode reasons are written for end users and pass
    /// through unchanged. Provider failures collapse to `fallback` so that
    /// upstream error bodies never reach the client.
    pub fn public_message(&self, fallback: &str) -> String {
        match self {
            RelayError::Validation(reason) | RelayError::Decode(reason) => reason.clone(),
            RelayError::Configuration(_) => CONFIGURATION_MESSAGE.to_string(),
            RelayError::MissingImage => MISSING_IMAGE_MESSAGE.to_string(),
            RelayError::Provider(_) | RelayError::Http(_) => fallback.to_string(),
            _ => INTERNAL_MESSAGE.to_string(),
        }
    }
}

// Default conversion for errors that escape a handler without pipeline context
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": self.public_message(INTERNAL_MESSAGE) });
        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
