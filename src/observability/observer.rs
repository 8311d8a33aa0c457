//! Injected observability sink for the execution engine.
//!
//! The engine reports every decision as an [`ExecutionEvent`] to the
//! client's observer instead of logging directly.

use std::sync::Mutex;
use std::time::Duration;

use uuid::Uuid;

use crate::network::NodeAddress;
use crate::observability::metrics;
use crate::resilience::ExecutionState;
use crate::transport::TransportError;
use crate::types::{AccountId, Status, TransactionId};

/// One engine decision.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    /// A node was picked for attempt `attempt` (one-based).
    NodeSelected {
        attempt: u32,
        node: AccountId,
        address: NodeAddress,
    },
    /// The node is still penalized; the engine waits before calling it.
    NodeUnhealthy { node: AccountId, wait: Duration },
    /// Opening the node's channel failed.
    ChannelFailed { node: AccountId, error: TransportError },
    /// The call itself failed at the transport layer.
    TransportFailed {
        node: AccountId,
        error: TransportError,
        transient: bool,
    },
    /// A reply was classified.
    Classified {
        node: AccountId,
        status: Status,
        state: ExecutionState,
    },
    /// Sleeping before the next attempt.
    Backoff { attempt: u32, delay: Duration },
    /// An expired transaction id was replaced.
    Regenerated {
        previous: TransactionId,
        next: TransactionId,
    },
    Finished { node: AccountId, attempts: u32 },
    Failed { attempts: u32, error: String },
}

/// Receives engine events.
pub trait ExecutionObserver: Send + Sync {
    fn record(&self, request_id: Uuid, event: &ExecutionEvent);
}

/// Default observer: `tracing` events plus metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExecutionObserver for TracingObserver {
    fn record(&self, request_id: Uuid, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::NodeSelected {
                attempt,
                node,
                address,
            } => {
                tracing::trace!(%request_id, attempt, node = %node, address = %address, "Executing request");
                metrics::record_attempt(&node.to_string());
            }
            ExecutionEvent::NodeUnhealthy { node, wait } => {
                tracing::trace!(%request_id, node = %node, wait_ms = wait.as_millis() as u64, "Node is unhealthy, waiting before continuing");
            }
            ExecutionEvent::ChannelFailed { node, error } => {
                tracing::debug!(%request_id, node = %node, error = %error, "Failed to open channel");
                metrics::record_transport_error(&node.to_string(), "connect");
            }
            ExecutionEvent::TransportFailed {
                node,
                error,
                transient,
            } => {
                if *transient {
                    tracing::debug!(%request_id, node = %node, code = %error.code, "Transient transport error, retrying");
                } else {
                    tracing::warn!(%request_id, node = %node, error = %error, "Transport error");
                }
                metrics::record_transport_error(&node.to_string(), &error.code.to_string());
            }
            ExecutionEvent::Classified {
                node,
                status,
                state,
            } => {
                tracing::trace!(%request_id, node = %node, status = %status, state = %state, "Received response");
            }
            ExecutionEvent::Backoff { attempt, delay } => {
                tracing::trace!(%request_id, attempt, delay_ms = delay.as_millis() as u64, "Retrying request attempt");
            }
            ExecutionEvent::Regenerated { previous, next } => {
                tracing::debug!(%request_id, previous = %previous, next = %next, "Transaction expired, regenerated transaction id");
            }
            ExecutionEvent::Finished { node, attempts } => {
                tracing::debug!(%request_id, node = %node, attempts, "Request finished");
                metrics::record_execution("finished", *attempts);
            }
            ExecutionEvent::Failed { attempts, error } => {
                tracing::debug!(%request_id, attempts, error = %error, "Request failed");
                metrics::record_execution("failed", *attempts);
            }
        }
    }
}

/// Keeps every event in memory. Handy in tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(Uuid, ExecutionEvent)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, in order.
    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Count events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&ExecutionEvent) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }
}

impl ExecutionObserver for RecordingObserver {
    fn record(&self, request_id: Uuid, event: &ExecutionEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((request_id, event.clone()));
    }
}
