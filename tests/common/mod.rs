//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ledger_dispatch::network::NodeAddress;
use ledger_dispatch::observability::RecordingObserver;
use ledger_dispatch::transport::tcp::Envelope;
use ledger_dispatch::transport::{
    Channel, Connector, QueryResponse, SubmitResponse, TransportError, WireQuery, WireRequest,
    WireTransaction,
};
use ledger_dispatch::{AccountId, Client, Status};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

type Behavior = Arc<dyn Fn(&WireRequest) -> Result<Status, TransportError> + Send + Sync>;

struct ScriptedNode {
    account_id: AccountId,
    reachable: bool,
    behavior: Behavior,
}

/// One call a node received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub node: AccountId,
    pub wire: WireRequest,
}

/// In-memory network whose nodes answer with scripted statuses.
#[derive(Default)]
pub struct MockLedger {
    nodes: Mutex<HashMap<NodeAddress, ScriptedNode>>,
    calls: Mutex<Vec<RecordedCall>>,
    connects: AtomicUsize,
}

#[allow(dead_code)]
impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn address(num: u64) -> NodeAddress {
        format!("10.0.0.{}:50211", num).parse().unwrap()
    }

    /// Register node `0.0.num` answering with `behavior`.
    pub fn node<F>(&self, num: u64, behavior: F) -> (AccountId, NodeAddress)
    where
        F: Fn(&WireRequest) -> Result<Status, TransportError> + Send + Sync + 'static,
    {
        self.register(num, true, Arc::new(behavior))
    }

    /// Register node `0.0.num` that answers every call with `status`.
    pub fn fixed_node(&self, num: u64, status: Status) -> (AccountId, NodeAddress) {
        self.node(num, move |_| Ok(status))
    }

    /// Register node `0.0.num` whose channel can never be opened.
    pub fn unreachable_node(&self, num: u64) -> (AccountId, NodeAddress) {
        self.register(num, false, Arc::new(|_| Ok(Status::Ok)))
    }

    fn register(&self, num: u64, reachable: bool, behavior: Behavior) -> (AccountId, NodeAddress) {
        let account_id = AccountId::from_num(num);
        let address = Self::address(num);
        self.nodes.lock().unwrap().insert(
            address.clone(),
            ScriptedNode {
                account_id,
                reachable,
                behavior,
            },
        );
        (account_id, address)
    }

    pub fn connector(self: &Arc<Self>) -> Arc<dyn Connector> {
        Arc::new(MockConnector {
            ledger: self.clone(),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Nodes called, in order.
    pub fn called_nodes(&self) -> Vec<AccountId> {
        self.calls().iter().map(|c| c.node).collect()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

struct MockConnector {
    ledger: Arc<MockLedger>,
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, address: &NodeAddress) -> Result<Arc<dyn Channel>, TransportError> {
        self.ledger.connects.fetch_add(1, Ordering::SeqCst);
        let nodes = self.ledger.nodes.lock().unwrap();
        match nodes.get(address) {
            Some(node) if node.reachable => Ok(Arc::new(MockChannel {
                ledger: self.ledger.clone(),
                account_id: node.account_id,
                behavior: node.behavior.clone(),
            })),
            _ => Err(TransportError::unavailable(format!(
                "connection refused: {}",
                address
            ))),
        }
    }
}

struct MockChannel {
    ledger: Arc<MockLedger>,
    account_id: AccountId,
    behavior: Behavior,
}

impl MockChannel {
    fn answer(&self, wire: WireRequest) -> Result<Status, TransportError> {
        let status = (self.behavior)(&wire);
        self.ledger.calls.lock().unwrap().push(RecordedCall {
            node: self.account_id,
            wire,
        });
        status
    }
}

#[async_trait]
impl Channel for MockChannel {
    async fn query(&self, request: WireQuery) -> Result<QueryResponse, TransportError> {
        let precheck = self.answer(WireRequest::Query(request))?;
        Ok(QueryResponse {
            precheck,
            cost: 0,
            body: serde_json::json!({ "node": self.account_id }),
        })
    }

    async fn submit_transaction(
        &self,
        request: WireTransaction,
    ) -> Result<SubmitResponse, TransportError> {
        let precheck = self.answer(WireRequest::Transaction(request))?;
        Ok(SubmitResponse { precheck, cost: 0 })
    }
}

/// Client over `nodes` with a recording observer and the stock backoff.
#[allow(dead_code)]
pub fn client(
    ledger: &Arc<MockLedger>,
    nodes: Vec<(AccountId, NodeAddress)>,
) -> (Client, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let client = Client::for_nodes(nodes, ledger.connector())
        .with_observer(observer.clone())
        .with_backoff(Duration::from_millis(250), Duration::from_secs(8));
    (client, observer)
}

/// Start a TCP mock node that answers each frame with `f(envelope)`.
///
/// `f` returns the full reply frame (`{"ok": ..}` or `{"error": ..}`).
#[allow(dead_code)]
pub async fn start_programmable_node<F>(f: F) -> SocketAddr
where
    F: Fn(Envelope) -> serde_json::Value + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (read, mut write) = socket.into_split();
                        let mut lines = BufReader::new(read).lines();
                        while let Ok(Some(line)) = lines.next_line().await {
                            let envelope: Envelope = match serde_json::from_str(&line) {
                                Ok(envelope) => envelope,
                                Err(_) => break,
                            };
                            let mut reply = serde_json::to_vec(&f(envelope)).unwrap();
                            reply.push(b'\n');
                            if write.write_all(&reply).await.is_err() {
                                break;
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}
