//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define page-serving metrics (requests, render latency, language decisions)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `pagebase_requests_total` (counter): requests by view, language, status
//! - `pagebase_render_duration_seconds` (histogram): dispatch + render latency
//! - `pagebase_language_decisions_total` (counter): decisions by source
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are bounded: views and languages come from configuration

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

/// Record one served request.
pub fn record_request(view: &str, language: &str, status: u16, start: Instant) {
    counter!(
        "pagebase_requests_total",
        "view" => view.to_string(),
        "language" => language.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("pagebase_render_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record where a language decision came from.
pub fn record_language_decision(source: &'static str) {
    counter!("pagebase_language_decisions_total", "source" => source).increment(1);
}
