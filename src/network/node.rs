//! A single ledger node.
//!
//! # Responsibilities
//! - Identify a node (account id + address)
//! - Own the lazily opened channel to it
//! - Track health: a penalty window that grows on transport failure and
//!   shrinks on success
//!
//! # Health Model
//! ```text
//! increase_delay:  bad_until = now + current_delay; current_delay doubles (≤ max)
//! decrease_delay:  current_delay halves (≥ min)
//! is_healthy:      bad_until has passed
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::time::Instant;

use crate::config::NodeBackoffConfig;
use crate::network::NodeAddress;
use crate::observability::metrics;
use crate::resilience::backoff::delay_for_attempt;
use crate::transport::{Channel, Connector, TransportError};
use crate::types::AccountId;

/// Bounds of a node's penalty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBackoff {
    pub min: Duration,
    pub max: Duration,
}

impl NodeBackoff {
    pub fn from_config(config: &NodeBackoffConfig) -> Self {
        Self {
            min: Duration::from_millis(config.min_backoff_ms),
            max: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

impl Default for NodeBackoff {
    fn default() -> Self {
        Self::from_config(&NodeBackoffConfig::default())
    }
}

#[derive(Debug, Default)]
struct Health {
    /// Exponent of the next penalty; doubles the window per failure.
    failures: u32,
    bad_until: Option<Instant>,
    last_used: Option<Instant>,
}

/// One remote service endpoint.
pub struct Node {
    account_id: AccountId,
    address: NodeAddress,
    backoff: NodeBackoff,
    connector: Arc<dyn Connector>,
    channel: OnceCell<Arc<dyn Channel>>,
    health: Mutex<Health>,
    use_count: AtomicU64,
}

impl Node {
    pub fn new(
        account_id: AccountId,
        address: NodeAddress,
        backoff: NodeBackoff,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            account_id,
            address,
            backoff,
            connector,
            channel: OnceCell::new(),
            health: Mutex::new(Health::default()),
            use_count: AtomicU64::new(0),
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    fn health(&self) -> MutexGuard<'_, Health> {
        // Health is plain data; a panic mid-update leaves it usable.
        self.health.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record that the node was just dispatched to.
    pub fn mark_in_use(&self) {
        self.use_count.fetch_add(1, Ordering::Relaxed);
        self.health().last_used = Some(Instant::now());
    }

    /// True once the current penalty window has elapsed.
    pub fn is_healthy(&self) -> bool {
        match self.health().bad_until {
            Some(until) => until <= Instant::now(),
            None => true,
        }
    }

    /// Time left in the penalty window.
    pub fn wait_remaining(&self) -> Duration {
        match self.health().bad_until {
            Some(until) => until.saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }

    /// Penalty applied by the next `increase_delay`.
    pub fn current_delay(&self) -> Duration {
        delay_for_attempt(self.health().failures, self.backoff.min, self.backoff.max)
    }

    /// Called after a transport failure.
    pub fn increase_delay(&self) {
        let delay = {
            let mut health = self.health();
            let delay = delay_for_attempt(health.failures, self.backoff.min, self.backoff.max);
            health.bad_until = Some(Instant::now() + delay);
            if delay < self.backoff.max {
                health.failures += 1;
            }
            delay
        };

        tracing::debug!(node = %self.account_id, delay_ms = delay.as_millis() as u64, "Node penalized");
        metrics::record_node_delay(&self.account_id.to_string(), delay);
    }

    /// Called after a successful call.
    pub fn decrease_delay(&self) {
        let mut health = self.health();
        health.failures = health.failures.saturating_sub(1);
    }

    pub fn use_count(&self) -> u64 {
        self.use_count.load(Ordering::Relaxed)
    }

    pub fn last_used(&self) -> Option<Instant> {
        self.health().last_used
    }

    /// Cached channel, opened on first use.
    ///
    /// Concurrent first callers share a single connect; a failed connect
    /// leaves the cell empty so the next call tries again.
    pub async fn channel(&self) -> Result<Arc<dyn Channel>, TransportError> {
        self.channel
            .get_or_try_init(|| self.connector.connect(&self.address))
            .await
            .map(Arc::clone)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("account_id", &self.account_id)
            .field("address", &self.address)
            .field("backoff", &self.backoff)
            .field("connected", &self.channel.initialized())
            .field("use_count", &self.use_count())
            .finish()
    }
}
