//! Structured logging.
//!
//! # Responsibilities
//! - Initialize a `tracing` subscriber for applications that want one
//! - Read the log filter from `LEDGER_DISPATCH_LOG`, falling back to config
//!
//! # Design Decisions
//! - The library never installs a subscriber on its own; applications call
//!   `init_logging` (or install their own) explicitly
//! - Engine events reach logs through `TracingObserver`, so tests can swap
//!   in a recording observer without touching global state

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "LEDGER_DISPATCH_LOG";

/// Install a global fmt subscriber.
///
/// `default_level` is used when `LEDGER_DISPATCH_LOG` is unset or invalid,
/// e.g. `"off"`, `"debug"`, `"ledger_dispatch=trace"`.
pub fn init_logging(default_level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
