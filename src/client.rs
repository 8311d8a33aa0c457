//! Ledger client.
//!
//! # Responsibilities
//! - Hold the network pool and the engine defaults
//! - Hold the operator account used to generate transaction ids
//! - Carry the observer every execution reports to

use std::sync::Arc;
use std::time::Duration;

use crate::config::{validated, ClientConfig, ConfigError, ExecutionConfig};
use crate::network::{Network, NodeAddress, NodeBackoff};
use crate::observability::{ExecutionObserver, TracingObserver};
use crate::transport::{Connector, TcpConnector};
use crate::types::AccountId;

/// Entry point for executing queries and transactions.
pub struct Client {
    network: Network,
    operator: Option<AccountId>,
    max_attempts: Option<u32>,
    min_backoff: Duration,
    max_backoff: Duration,
    regenerate_transaction_id: bool,
    max_nodes_per_request: usize,
    observer: Arc<dyn ExecutionObserver>,
}

impl Client {
    /// Create a client over `network` with default engine settings.
    pub fn new(network: Network) -> Self {
        let defaults = ExecutionConfig::default();
        Self {
            network,
            operator: None,
            max_attempts: defaults.max_attempts,
            min_backoff: Duration::from_millis(defaults.min_backoff_ms),
            max_backoff: Duration::from_millis(defaults.max_backoff_ms),
            regenerate_transaction_id: defaults.regenerate_transaction_id,
            max_nodes_per_request: defaults.max_nodes_per_request,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Build a client talking TCP to the configured nodes.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_connector(config, Arc::new(TcpConnector::from_config(&config.transport)))
    }

    /// Build a client using a custom transport.
    pub fn from_config_with_connector(
        config: &ClientConfig,
        connector: Arc<dyn Connector>,
    ) -> Result<Self, ConfigError> {
        let parsed = validated(config)?;

        let network = Network::with_nodes(
            parsed.nodes,
            connector,
            NodeBackoff::from_config(&config.node_backoff),
        );

        let execution = &config.execution;
        let client = Self {
            network,
            operator: parsed.operator,
            max_attempts: execution.max_attempts,
            min_backoff: Duration::from_millis(execution.min_backoff_ms),
            max_backoff: Duration::from_millis(execution.max_backoff_ms),
            regenerate_transaction_id: execution.regenerate_transaction_id,
            max_nodes_per_request: execution.max_nodes_per_request,
            observer: Arc::new(TracingObserver),
        };

        tracing::info!(
            nodes = client.network.len(),
            max_attempts = ?client.max_attempts,
            operator = ?client.operator.map(|id| id.to_string()),
            "Client initialized"
        );

        Ok(client)
    }

    /// Create a client from `(account id, address)` pairs with defaults.
    pub fn for_nodes<I>(nodes: I, connector: Arc<dyn Connector>) -> Self
    where
        I: IntoIterator<Item = (AccountId, NodeAddress)>,
    {
        Self::new(Network::with_nodes(nodes, connector, NodeBackoff::default()))
    }

    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_operator(mut self, operator: AccountId) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Cap every execution at `max_attempts`, overriding the request's own limit.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_backoff(mut self, min_backoff: Duration, max_backoff: Duration) -> Self {
        self.min_backoff = min_backoff;
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_regenerate_transaction_id(mut self, regenerate: bool) -> Self {
        self.regenerate_transaction_id = regenerate;
        self
    }

    pub fn with_max_nodes_per_request(mut self, max_nodes: usize) -> Self {
        self.max_nodes_per_request = max_nodes;
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Operator account, ignoring the all-zero id.
    pub fn operator(&self) -> Option<AccountId> {
        self.operator.filter(|id| !id.is_zero())
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn min_backoff(&self) -> Duration {
        self.min_backoff
    }

    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    pub fn regenerate_transaction_id(&self) -> bool {
        self.regenerate_transaction_id
    }

    pub(crate) fn max_nodes_per_request(&self) -> usize {
        self.max_nodes_per_request
    }

    pub(crate) fn observer(&self) -> &dyn ExecutionObserver {
        self.observer.as_ref()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("network", &self.network)
            .field("operator", &self.operator)
            .field("max_attempts", &self.max_attempts)
            .field("min_backoff", &self.min_backoff)
            .field("max_backoff", &self.max_backoff)
            .field("regenerate_transaction_id", &self.regenerate_transaction_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NodeConfig, OperatorConfig};

    fn config() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.network.push(NodeConfig {
            account_id: "0.0.3".into(),
            address: "127.0.0.1:50211".into(),
        });
        config.network.push(NodeConfig {
            account_id: "0.0.4".into(),
            address: "127.0.0.1:50212".into(),
        });
        config.execution.max_attempts = Some(4);
        config.operator = Some(OperatorConfig {
            account_id: "0.0.2".into(),
        });
        config
    }

    #[tokio::test]
    async fn test_from_config() {
        let client = Client::from_config(&config()).unwrap();
        assert_eq!(client.network().len(), 2);
        assert_eq!(client.max_attempts(), Some(4));
        assert_eq!(client.min_backoff(), Duration::from_millis(250));
        assert_eq!(client.operator(), Some(AccountId::from_num(2)));
        assert!(client
            .network()
            .resolve(&AccountId::from_num(4))
            .is_some());
    }

    #[test]
    fn test_attempt_limit_unset_by_default() {
        let mut cfg = config();
        cfg.execution.max_attempts = None;
        let client = Client::from_config(&cfg).unwrap();
        assert_eq!(client.max_attempts(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config();
        bad.network[1].address = "nowhere".into();
        let err = Client::from_config(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_operator_is_ignored() {
        let mut cfg = config();
        cfg.operator = Some(OperatorConfig {
            account_id: "0.0.0".into(),
        });
        let client = Client::from_config(&cfg).unwrap();
        assert_eq!(client.operator(), None);
    }
}
