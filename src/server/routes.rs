// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    analyze_handler, generate_handler, health_handler, index_handler, metrics_handler,
};
use super::middleware::{compression_layer, cors_layer, request_id_layers};
use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared, read-only per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analysis: Arc<Pipeline>,
    pub generation: Arc<Pipeline>,
}

pub fn create_router(config: AppConfig, analysis: Pipeline, generation: Pipeline) -> Router {
    let (set_request_id, propagate_request_id) = request_id_layers();
    let cors = cors_layer(&config.server);
    let compression = compression_layer(&config.server);
    let body_limit = config.server.max_body_bytes;

    let state = AppState {
        config: Arc::new(config),
        analysis: Arc::new(analysis),
        generation: Arc::new(generation),
    };

    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/analyze", post(analyze_handler))
        .route("/generate", post(generate_handler))
        // Kept above the pipeline limits so oversize files get a validation
        // message instead of a bare 413
        .layer(DefaultBodyLimit::max(body_limit));

    if let Some(compression) = compression {
        app = app.layer(compression);
    }
    if let Some(cors) = cors {
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state)
}
