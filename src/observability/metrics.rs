//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): handler latency
//! - `gateway_upstream_requests_total` (counter): backend calls by operation, status
//! - `gateway_upstream_duration_seconds` (histogram): backend latency
//! - `gateway_upstream_errors_total` (counter): transport/decode/contract failures
//! - `gateway_sessions_total` (counter): login/logout events
//! - `gateway_gate_redirects_total` (counter): navigation redirects by target
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("route", route.to_string()),
    ];
    let mut with_status = labels.clone();
    with_status.push(Label::new("status", status.to_string()));

    metrics::counter!("gateway_requests_total", with_status).increment(1);
    metrics::histogram!("gateway_request_duration_seconds", labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(operation: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_upstream_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_upstream_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(kind: &'static str) {
    metrics::counter!("gateway_upstream_errors_total", "kind" => kind).increment(1);
}

pub fn record_session(event: &'static str) {
    metrics::counter!("gateway_sessions_total", "event" => event).increment(1);
}

pub fn record_gate_redirect(target: &'static str) {
    metrics::counter!("gateway_gate_redirects_total", "target" => target).increment(1);
}

/// Route-level middleware recording request count and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
