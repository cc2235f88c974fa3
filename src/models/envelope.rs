// JSON envelopes returned to HTTP callers
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// `POST /analyze` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    pub response: String,
}

/// `POST /generate` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationEnvelope {
    pub success: bool,
    /// `data:<mime>;base64,...` of the upload.
    pub original_image: String,
    /// `data:<mime>;base64,...` of the model output.
    pub generated_image: String,
    pub message: String,
}

/// Failure body for every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}
