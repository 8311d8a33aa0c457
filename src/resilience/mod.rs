//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Channel call fails
//!     → classifier.rs is_transient (retry on next node, or abort)
//!
//! Node replies
//!     → classifier.rs status table → ExecutionState
//!     → Retry: backoff.rs delay_for_attempt, sleep, next attempt
//!
//! Node transport failure
//!     → backoff.rs also sizes the node's own penalty window
//! ```
//!
//! # Design Decisions
//! - Backoff is a pure function; callers own the sleeping
//! - No jitter: attempts rotate across nodes, which already spreads load
//! - Transport errors are fatal unless known transient

pub mod backoff;
pub mod classifier;

pub use backoff::delay_for_attempt;
pub use classifier::{is_transient, ExecutionState};
