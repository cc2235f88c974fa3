// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::config::ErrorStatusPolicy;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::{
    AnalysisEnvelope, ErrorEnvelope, GenerationEnvelope, HealthResponse, HealthStatus,
};
use crate::pipeline::{Outcome, Pipeline};
use crate::vision::validation::too_large_message;
use crate::vision::{UploadPolicy, UploadedImage, MISSING_FILE_MESSAGE};
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, warn};

/// Name of the multipart field carrying the image.
const FILE_FIELD: &str = "file";

pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

/// Handler for `POST /analyze`: food photo in, model text out.
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let start = Instant::now();
    let pipeline = &state.analysis;

    let result = match read_upload(multipart, pipeline.policy()).await {
        Ok(upload) => pipeline.run(upload).await,
        Err(e) => Err(e),
    };

    let (status, response) = match result {
        Ok(Outcome::Analysis { text }) => (
            StatusCode::OK,
            Json(AnalysisEnvelope { response: text }).into_response(),
        ),
        Ok(other) => unexpected_outcome(pipeline, other),
        Err(e) => {
            let status = match state.config.analysis.error_status {
                ErrorStatusPolicy::StatusCodes => e.status(),
                ErrorStatusPolicy::AlwaysOk => StatusCode::OK,
            };
            error_response(pipeline, e, status)
        }
    };

    metrics::record_request("/analyze", status.as_u16(), start.elapsed().as_secs_f64());
    response
}

/// Handler for `POST /generate`: portrait in, studio portrait out.
pub async fn generate_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let start = Instant::now();
    let pipeline = &state.generation;

    let result = match read_upload(multipart, pipeline.policy()).await {
        Ok(upload) => pipeline.run(upload).await,
        Err(e) => Err(e),
    };

    let (status, response) = match result {
        Ok(Outcome::Portrait {
            message,
            original_image,
            generated_image,
        }) => (
            StatusCode::OK,
            Json(GenerationEnvelope {
                success: true,
                original_image,
                generated_image,
                message,
            })
            .into_response(),
        ),
        Ok(other) => unexpected_outcome(pipeline, other),
        Err(e) => {
            let status = e.status();
            error_response(pipeline, e, status)
        }
    };

    metrics::record_request("/generate", status.as_u16(), start.elapsed().as_secs_f64());
    response
}

/// Pull the `file` field out of the multipart body. Other fields are skipped.
async fn read_upload(
    multipart: std::result::Result<Multipart, MultipartRejection>,
    policy: &UploadPolicy,
) -> Result<UploadedImage> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Rejected non-multipart upload: {}", e.body_text());
        RelayError::Validation("Požadavek musí být typu multipart/form-data.".to_string())
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, policy))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, policy))?;

        return Ok(UploadedImage::new(bytes, mime_type));
    }

    Err(RelayError::Validation(MISSING_FILE_MESSAGE.to_string()))
}

/// The body limit tripping mid-read is reported as an oversize file.
fn multipart_error(e: MultipartError, policy: &UploadPolicy) -> RelayError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::Validation(too_large_message(policy))
    } else {
        RelayError::Validation(format!("Neplatný multipart požadavek: {}", e.body_text()))
    }
}

fn error_response(pipeline: &Pipeline, e: RelayError, status: StatusCode) -> (StatusCode, Response) {
    if e.status().is_server_error() {
        error!("{} request failed: {}", pipeline.name(), e);
    }

    let body = ErrorEnvelope {
        error: e.public_message(pipeline.failure_message()),
    };
    (status, json_response(status, body))
}

fn unexpected_outcome(pipeline: &Pipeline, outcome: Outcome) -> (StatusCode, Response) {
    let e = RelayError::Internal(format!(
        "{} pipeline produced an unexpected outcome: {:?}",
        pipeline.name(),
        std::mem::discriminant(&outcome)
    ));
    let status = e.status();
    error_response(pipeline, e, status)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}
