// HTTP middleware
// Author: kelexine (https://github.com/kelexine)

use crate::config::ServerConfig;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Create request ID layers for the application
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

/// Permissive CORS so the upload page can be hosted elsewhere during development
pub fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    config.cors_permissive.then(CorsLayer::permissive)
}

/// Gzip for the large base64 JSON bodies returned by `/generate`
pub fn compression_layer(config: &ServerConfig) -> Option<CompressionLayer> {
    config.enable_compression.then(CompressionLayer::new)
}
