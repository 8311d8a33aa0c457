//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Execution engine
//!     → observer.rs ExecutionObserver (injected per client)
//!         → TracingObserver: tracing events + metrics.rs
//!         → RecordingObserver: in-memory, for tests
//!
//! Applications
//!     → init(&ObservabilityConfig)
//!         → logging.rs init_logging (optional global subscriber)
//!         → metrics.rs init_metrics (optional Prometheus exporter)
//! ```
//!
//! # Design Decisions
//! - No global state is touched implicitly
//! - Every event carries the execution's request id (UUID v4)
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod observer;

pub use observer::{ExecutionEvent, ExecutionObserver, RecordingObserver, TracingObserver};

use crate::config::ObservabilityConfig;

/// Apply the `[observability]` config section: install the log subscriber
/// and, when enabled, the metrics exporter.
///
/// Call once at startup from within a tokio runtime. A subscriber that is
/// already installed is left in place.
pub fn init(config: &ObservabilityConfig) {
    if let Err(e) = self::logging::init_logging(&config.log_level) {
        tracing::debug!(error = %e, "Log subscriber already installed");
    }

    if !config.metrics_enabled {
        return;
    }
    match config.metrics_address.parse() {
        Ok(addr) => self::metrics::init_metrics(addr),
        Err(e) => tracing::error!(
            address = %config.metrics_address,
            error = %e,
            "Invalid metrics address, exporter not started"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_twice_is_harmless() {
        let config = ObservabilityConfig::default();
        init(&config);
        init(&config);
    }
}
