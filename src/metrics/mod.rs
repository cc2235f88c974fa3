// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, PROVIDER_CALLS, PROVIDER_DURATION, REQUESTS_TOTAL, REQUEST_DURATION,
    UPLOAD_BYTES, UPLOAD_REJECTIONS,
};

/// Helper to record request metrics
pub fn record_request(endpoint: &str, status_code: u16, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status_code.to_string()])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helper to record upstream provider call metrics
pub fn record_provider_call(provider: &str, model: &str, outcome: &str, duration_secs: f64) {
    PROVIDER_CALLS
        .with_label_values(&[provider, model, outcome])
        .inc();

    PROVIDER_DURATION
        .with_label_values(&[provider])
        .observe(duration_secs);
}

pub fn record_upload(pipeline: &str, bytes: usize) {
    UPLOAD_BYTES
        .with_label_values(&[pipeline])
        .observe(bytes as f64);
}

pub fn record_rejection(pipeline: &str, reason: &str) {
    UPLOAD_REJECTIONS
        .with_label_values(&[pipeline, reason])
        .inc();
}
