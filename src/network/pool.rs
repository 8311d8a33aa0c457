//! Network pool.
//!
//! # Responsibilities
//! - Own the node set, keyed by node account id
//! - Resolve the id a request points at into a `Node`
//! - Pick default nodes for requests that didn't pin any
//! - Swap the node set atomically, keeping state for unchanged nodes

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::seq::SliceRandom;

use crate::network::node::{Node, NodeBackoff};
use crate::network::NodeAddress;
use crate::transport::Connector;
use crate::types::AccountId;

type NodeMap = HashMap<AccountId, Arc<Node>>;

/// The set of nodes a client talks to.
pub struct Network {
    nodes: ArcSwap<NodeMap>,
    connector: Arc<dyn Connector>,
    backoff: NodeBackoff,
}

impl Network {
    /// Create an empty network.
    pub fn new(connector: Arc<dyn Connector>, backoff: NodeBackoff) -> Self {
        Self {
            nodes: ArcSwap::from_pointee(HashMap::new()),
            connector,
            backoff,
        }
    }

    /// Create a network with the given nodes.
    pub fn with_nodes<I>(nodes: I, connector: Arc<dyn Connector>, backoff: NodeBackoff) -> Self
    where
        I: IntoIterator<Item = (AccountId, NodeAddress)>,
    {
        let network = Self::new(connector, backoff);
        network.set_network(nodes);
        network
    }

    /// Replace the node set.
    ///
    /// Nodes whose id and address are unchanged are carried over with their
    /// health state and open channel; everything else is rebuilt.
    pub fn set_network<I>(&self, nodes: I)
    where
        I: IntoIterator<Item = (AccountId, NodeAddress)>,
    {
        let current = self.nodes.load();
        let mut next = NodeMap::new();

        for (account_id, address) in nodes {
            let node = match current.get(&account_id) {
                Some(existing) if existing.address() == &address => existing.clone(),
                _ => Arc::new(Node::new(
                    account_id,
                    address,
                    self.backoff,
                    self.connector.clone(),
                )),
            };
            next.insert(account_id, node);
        }

        tracing::info!(nodes = next.len(), "Network updated");
        self.nodes.store(Arc::new(next));
    }

    /// Look up a node. Pure; does not touch health state.
    pub fn resolve(&self, account_id: &AccountId) -> Option<Arc<Node>> {
        self.nodes.load().get(account_id).cloned()
    }

    /// Return a list of all nodes.
    pub fn nodes(&self) -> Vec<Arc<Node>> {
        self.nodes.load().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.load().is_empty()
    }

    /// Node ids for a request that didn't pin any.
    ///
    /// Healthy nodes in random order, at most `max` of them (0 = all). When
    /// no node is healthy every node is returned, since the engine waits out
    /// a penalty rather than skipping a node.
    pub fn select_nodes(&self, max: usize) -> Vec<AccountId> {
        let nodes = self.nodes.load();
        let mut healthy: Vec<AccountId> = nodes
            .values()
            .filter(|node| node.is_healthy())
            .map(|node| node.account_id())
            .collect();

        if healthy.is_empty() {
            healthy = nodes.keys().copied().collect();
        }

        healthy.shuffle(&mut rand::thread_rng());
        if max > 0 {
            healthy.truncate(max);
        }
        healthy
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nodes = self.nodes.load();
        let mut ids: Vec<&AccountId> = nodes.keys().collect();
        ids.sort();
        f.debug_struct("Network")
            .field("nodes", &ids)
            .field("backoff", &self.backoff)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::transport::{Channel, TransportError};

    struct RefusingConnector;

    #[async_trait]
    impl Connector for RefusingConnector {
        async fn connect(&self, _: &NodeAddress) -> Result<Arc<dyn Channel>, TransportError> {
            Err(TransportError::unavailable("refused"))
        }
    }

    fn entry(num: u64, port: u16) -> (AccountId, NodeAddress) {
        (
            AccountId::from_num(num),
            format!("127.0.0.1:{}", port).parse().unwrap(),
        )
    }

    fn network(entries: Vec<(AccountId, NodeAddress)>) -> Network {
        Network::with_nodes(entries, Arc::new(RefusingConnector), NodeBackoff::default())
    }

    #[test]
    fn test_resolve() {
        let net = network(vec![entry(3, 50211), entry(4, 50212)]);
        assert_eq!(net.len(), 2);

        let node = net.resolve(&AccountId::from_num(4)).unwrap();
        assert_eq!(node.address().port(), 50212);
        assert!(net.resolve(&AccountId::from_num(99)).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_is_idempotent() {
        let net = network(vec![entry(3, 50211)]);
        let id = AccountId::from_num(3);

        let first = net.resolve(&id).unwrap();
        let before = (first.is_healthy(), first.current_delay(), first.use_count());
        let second = net.resolve(&id).unwrap();
        let after = (second.is_healthy(), second.current_delay(), second.use_count());

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(before, after);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_network_keeps_unchanged_nodes() {
        let net = network(vec![entry(3, 50211), entry(4, 50212)]);
        let kept = net.resolve(&AccountId::from_num(3)).unwrap();
        kept.increase_delay();
        let moved = net.resolve(&AccountId::from_num(4)).unwrap();

        net.set_network(vec![entry(3, 50211), entry(4, 60000), entry(5, 50213)]);

        let still = net.resolve(&AccountId::from_num(3)).unwrap();
        assert!(Arc::ptr_eq(&kept, &still));
        assert!(!still.is_healthy());

        let rebuilt = net.resolve(&AccountId::from_num(4)).unwrap();
        assert!(!Arc::ptr_eq(&moved, &rebuilt));
        assert_eq!(rebuilt.address().port(), 60000);
        assert_eq!(net.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_nodes_prefers_healthy() {
        let net = network(vec![entry(3, 50211), entry(4, 50212), entry(5, 50213)]);
        net.resolve(&AccountId::from_num(4)).unwrap().increase_delay();

        let mut selected = net.select_nodes(0);
        selected.sort();
        assert_eq!(selected, vec![AccountId::from_num(3), AccountId::from_num(5)]);

        assert_eq!(net.select_nodes(1).len(), 1);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(net.select_nodes(0).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_nodes_falls_back_to_all() {
        let net = network(vec![entry(3, 50211), entry(4, 50212)]);
        for node in net.nodes() {
            node.increase_delay();
        }
        assert_eq!(net.select_nodes(0).len(), 2);
    }
}
