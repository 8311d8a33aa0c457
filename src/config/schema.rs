//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a ledger client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Nodes making up the network, keyed by their account id.
    pub network: Vec<NodeConfig>,

    /// Engine defaults (attempts, backoff, id regeneration).
    pub execution: ExecutionConfig,

    /// Per-node backoff applied after transport failures.
    pub node_backoff: NodeBackoffConfig,

    /// Timeout configuration for node channels.
    pub transport: TransportConfig,

    /// Operator account paying for transactions, if any.
    pub operator: Option<OperatorConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single node of the network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Node account id (e.g., "0.0.3").
    pub account_id: String,

    /// Node address (e.g., "127.0.0.1:50211").
    pub address: String,
}

/// Execution engine defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Attempt limit for every execution. Unset leaves it to each request
    /// (10 unless the request says otherwise); set, it wins over the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Minimum delay between application-level retries in milliseconds.
    pub min_backoff_ms: u64,

    /// Maximum delay between application-level retries in milliseconds.
    pub max_backoff_ms: u64,

    /// Regenerate expired transaction ids unless the request says otherwise.
    pub regenerate_transaction_id: bool,

    /// Nodes picked for a request that didn't pin any (0 = all).
    pub max_nodes_per_request: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            min_backoff_ms: 250,
            max_backoff_ms: 8_000,
            regenerate_transaction_id: true,
            max_nodes_per_request: 0,
        }
    }
}

/// Backoff bounds for node health tracking.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeBackoffConfig {
    /// Delay applied after a node's first transport failure, in milliseconds.
    pub min_backoff_ms: u64,

    /// Upper bound for a node's delay, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for NodeBackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 8_000,
            max_backoff_ms: 3_600_000,
        }
    }
}

/// Timeout configuration for node channels.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Per-call timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
        }
    }
}

/// Operator account configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperatorConfig {
    /// Operator account id (e.g., "0.0.2").
    pub account_id: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (off, trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "off".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9091".to_string(),
        }
    }
}
