//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ledger_dispatch_attempts_total` (counter): calls dispatched, by node
//! - `ledger_dispatch_transport_errors_total` (counter): by node, code
//! - `ledger_dispatch_executions_total` (counter): by outcome
//! - `ledger_dispatch_execution_attempts` (histogram): attempts per execution
//! - `ledger_dispatch_node_delay_seconds` (gauge): last penalty per node
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are node ids and status codes, both low-cardinality

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_attempt(node: &str) {
    counter!("ledger_dispatch_attempts_total", "node" => node.to_string()).increment(1);
}

pub fn record_transport_error(node: &str, code: &str) {
    counter!(
        "ledger_dispatch_transport_errors_total",
        "node" => node.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
}

pub fn record_node_delay(node: &str, delay: Duration) {
    gauge!("ledger_dispatch_node_delay_seconds", "node" => node.to_string())
        .set(delay.as_secs_f64());
}

pub fn record_execution(outcome: &'static str, attempts: u32) {
    counter!("ledger_dispatch_executions_total", "outcome" => outcome).increment(1);
    histogram!("ledger_dispatch_execution_attempts").record(attempts as f64);
}
