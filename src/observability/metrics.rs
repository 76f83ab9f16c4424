//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dashboard_rpc_calls_total` (counter): contract reads by operation, outcome
//! - `dashboard_rpc_duration_seconds` (histogram): read latency
//! - `dashboard_transactions_total` (counter): writes by operation, outcome
//! - `dashboard_transaction_duration_seconds` (histogram): send-to-receipt latency
//! - `dashboard_api_requests_total` (counter): API requests by method, status
//! - `dashboard_wallet_events_total` (counter): decoded wallet events by kind
//!
//! Recording is a no-op until a recorder is installed, so library code can
//! call these unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one contract read.
pub fn record_rpc_call(op: &str, outcome: &str, start: Instant) {
    let op = op.to_string();
    let outcome = outcome.to_string();
    metrics::counter!("dashboard_rpc_calls_total", "op" => op.clone(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!("dashboard_rpc_duration_seconds", "op" => op)
        .record(start.elapsed().as_secs_f64());
}

/// Record one contract write.
pub fn record_transaction(op: &str, outcome: &str, start: Instant) {
    let op = op.to_string();
    let outcome = outcome.to_string();
    metrics::counter!("dashboard_transactions_total", "op" => op.clone(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!("dashboard_transaction_duration_seconds", "op" => op)
        .record(start.elapsed().as_secs_f64());
}

/// Record one API request.
pub fn record_api_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "dashboard_api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("dashboard_api_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record decoded wallet events.
pub fn record_wallet_events(kind: &'static str, count: u64) {
    metrics::counter!("dashboard_wallet_events_total", "kind" => kind).increment(count);
}
