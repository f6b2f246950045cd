//! Metrics collection and exposition.
//!
//! # Metrics
//! - `weft_requests_total` (counter): requests by method, status, route
//! - `weft_request_duration_seconds` (histogram): latency distribution
//! - `weft_suspense_pending` (gauge): in-flight deferred subtrees
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations behind the macros)
//! - The route label is the matched pattern template, never the raw path,
//!   so cardinality stays bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics exporter listening");
            metrics::describe_counter!(
                "weft_requests_total",
                "Total requests by method, status and route"
            );
            metrics::describe_histogram!(
                "weft_request_duration_seconds",
                "Request latency distribution"
            );
            metrics::describe_gauge!(
                "weft_suspense_pending",
                "Deferred subtrees currently in flight"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    metrics::counter!(
        "weft_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "weft_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn suspense_started() {
    metrics::gauge!("weft_suspense_pending").increment(1.0);
}

pub fn suspense_resolved() {
    metrics::gauge!("weft_suspense_pending").decrement(1.0);
}
