//! Prometheus metrics for the admin server and CLI
//!
//! Call [`init_metrics`] once at startup. If registration fails, recording
//! becomes a no-op so the application keeps running without metrics.

use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

/// Container for all admin metrics
struct AdminMetrics {
    http_requests: CounterVec,
    http_duration: HistogramVec,
    bulk_updates: CounterVec,
    rows_seeded: CounterVec,
}

static ADMIN_METRICS: OnceLock<AdminMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

/// Initialize all Prometheus metrics.
///
/// Safe to call more than once; only the first call registers anything.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = AdminMetrics {
        http_requests: register_counter_vec!(
            "quill_http_requests_total",
            "Admin API requests by route and status",
            &["route", "status"]
        )?,
        http_duration: register_histogram_vec!(
            "quill_http_request_duration_seconds",
            "Admin API request duration by route",
            &["route"]
        )?,
        bulk_updates: register_counter_vec!(
            "quill_bulk_updated_rows_total",
            "Rows changed by bulk admin actions, by model and action",
            &["model", "action"]
        )?,
        rows_seeded: register_counter_vec!(
            "quill_rows_seeded_total",
            "Rows created by the seed command, by model",
            &["model"]
        )?,
    };

    ADMIN_METRICS.set(metrics).ok();
    Ok(())
}

/// Record one handled HTTP request
pub fn record_http_request(route: &str, status: u16, duration_secs: f64) {
    if let Some(m) = ADMIN_METRICS.get() {
        m.http_requests
            .with_label_values(&[route, &status.to_string()])
            .inc();
        m.http_duration
            .with_label_values(&[route])
            .observe(duration_secs);
    }
}

/// Record rows changed by a bulk action
pub fn record_bulk_update(model: &str, action: &str, rows: usize) {
    if let Some(m) = ADMIN_METRICS.get() {
        m.bulk_updates
            .with_label_values(&[model, action])
            .inc_by(rows as f64);
    }
}

/// Record rows created by the seeder
pub fn record_seeded(model: &str, rows: usize) {
    if let Some(m) = ADMIN_METRICS.get() {
        m.rows_seeded
            .with_label_values(&[model])
            .inc_by(rows as f64);
    }
}

/// Render the default registry in Prometheus text exposition format
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_and_record_are_safe() {
        init_metrics().unwrap();
        // Second init is a no-op
        init_metrics().unwrap();

        record_http_request("/api/blogs", 200, 0.003);
        record_bulk_update("blog", "publish", 3);
        record_seeded("comment", 12);

        let text = render();
        assert!(text.contains("quill_http_requests_total"));
        assert!(text.contains("quill_bulk_updated_rows_total"));
    }

    #[test]
    fn test_record_without_init_is_noop() {
        // Recording never panics even when called before/without init
        record_http_request("/api/health", 200, 0.001);
    }
}
