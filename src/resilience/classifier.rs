//! Outcome classification.
//!
//! Two layers:
//! - transport: decides whether a failed channel call is worth retrying
//! - application: maps a node's precheck status to an [`ExecutionState`]
//!
//! The application tables here are the defaults used by the built-in query
//! and submit operations; other operations supply their own.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::transport::{Code, TransportError};
use crate::types::Status;

/// What the engine should do with a well-formed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    /// Try again after backoff, on the next node.
    Retry,
    /// Decode the reply and return it.
    Finished,
    /// The node rejected the request; stop.
    Error,
    /// The transaction id is stale; regenerate it if allowed.
    Expired,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionState::Retry => "retry",
            ExecutionState::Finished => "finished",
            ExecutionState::Error => "error",
            ExecutionState::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// Returns true when a transport failure is transient.
///
/// Resource exhaustion and unavailability always are. `Internal` only is
/// when the message is a stream reset, which multiplexed connections emit
/// under load.
pub fn is_transient(err: &TransportError) -> bool {
    match err.code {
        Code::ResourceExhausted | Code::Unavailable => true,
        Code::Internal => is_stream_reset(&err.message),
        _ => false,
    }
}

/// `rst` and `stream` as whole words joined by one non-alphanumeric
/// character (`RST_STREAM`, `rst stream`, `Rst-Stream`).
static RST_STREAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\brst[^0-9a-zA-Z]stream\b").expect("stream reset pattern compiles")
});

/// Returns true when `message` reports an HTTP/2 stream reset.
pub fn is_stream_reset(message: &str) -> bool {
    RST_STREAM.is_match(message)
}

/// Default table for queries.
pub fn query_should_retry(status: Status) -> ExecutionState {
    match status {
        Status::Busy | Status::PlatformNotActive => ExecutionState::Retry,
        Status::Ok => ExecutionState::Finished,
        _ => ExecutionState::Error,
    }
}

/// Default table for transaction submissions.
pub fn transaction_should_retry(status: Status) -> ExecutionState {
    match status {
        Status::Busy | Status::PlatformTransactionNotCreated | Status::PlatformNotActive => {
            ExecutionState::Retry
        }
        Status::Ok => ExecutionState::Finished,
        Status::TransactionExpired => ExecutionState::Expired,
        _ => ExecutionState::Error,
    }
}
