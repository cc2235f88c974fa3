// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of HTTP requests by endpoint and final status
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of HTTP requests"),
        &["endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["endpoint"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // UPLOAD METRICS
    // ============================================================================

    /// Uploads rejected before reaching a provider
    pub static ref UPLOAD_REJECTIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("upload_rejections_total", "Uploads rejected by validation"),
        &["pipeline", "reason"],
        REGISTRY
    ).unwrap();

    /// Size of received uploads
    pub static ref UPLOAD_BYTES: HistogramVec = register_histogram_vec_with_registry!(
        HistogramOpts::new("upload_bytes", "Size of uploaded files in bytes")
            .buckets(vec![
                64.0 * 1024.0,
                256.0 * 1024.0,
                1024.0 * 1024.0,
                4.0 * 1024.0 * 1024.0,
                10.0 * 1024.0 * 1024.0,
                20.0 * 1024.0 * 1024.0,
            ]),
        &["pipeline"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // PROVIDER METRICS
    // ============================================================================

    /// Total upstream provider calls
    pub static ref PROVIDER_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("provider_calls_total", "Total upstream provider calls"),
        &["provider", "model", "outcome"],
        REGISTRY
    ).unwrap();

    /// Upstream provider call duration
    pub static ref PROVIDER_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        HistogramOpts::new("provider_duration_seconds", "Upstream provider call duration")
            .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
        &["provider"],
        REGISTRY
    ).unwrap();
}

/// Render all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
