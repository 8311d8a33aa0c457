//! Newline-delimited JSON channel over TCP.
//!
//! # Framing
//! ```text
//! client → node:  {"method":"query","payload":{..}}\n
//! node → client:  {"ok":{..}}\n   or   {"error":{"code":"unavailable","message":".."}}\n
//! ```
//!
//! # Design Decisions
//! - One connection per node, calls on it are serialized by a mutex
//! - A connection that fails or times out mid-call is dropped and reopened
//!   lazily on the next call, since its stream position is unknown
//! - Reply parse failures surface as `Internal`

use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::config::TransportConfig;
use crate::network::NodeAddress;
use crate::transport::channel::{Channel, Connector};
use crate::transport::code::{Code, TransportError};
use crate::transport::wire::{QueryResponse, SubmitResponse, WireQuery, WireTransaction};

/// Request frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "payload", rename_all = "snake_case")]
pub enum Envelope {
    Query(WireQuery),
    SubmitTransaction(WireTransaction),
}

/// Reply frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply<T> {
    Ok(T),
    Error(TransportError),
}

/// Opens [`TcpChannel`]s.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl TcpConnector {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            request_timeout,
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(
            Duration::from_millis(config.connect_timeout_ms),
            Duration::from_millis(config.request_timeout_ms),
        )
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::from_config(&TransportConfig::default())
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, address: &NodeAddress) -> Result<Arc<dyn Channel>, TransportError> {
        let connection = Connection::open(address, self.connect_timeout).await?;
        tracing::debug!(address = %address, "Opened node channel");

        Ok(Arc::new(TcpChannel {
            address: address.clone(),
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
            connection: Mutex::new(Some(connection)),
        }))
    }
}

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(address: &NodeAddress, connect_timeout: Duration) -> Result<Self, TransportError> {
        let connect = TcpStream::connect((address.host(), address.port()));
        let stream = match timeout(connect_timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(TransportError::unavailable(format!(
                    "failed to connect to {}: {}",
                    address, e
                )))
            }
            Err(_) => {
                return Err(TransportError::new(
                    Code::DeadlineExceeded,
                    format!("connect to {} timed out", address),
                ))
            }
        };

        let _ = stream.set_nodelay(true);
        let (read, write) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read),
            writer: write,
        })
    }

    async fn round_trip(&mut self, frame: &[u8]) -> io::Result<String> {
        self.writer.write_all(frame).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by node",
            ));
        }
        Ok(line)
    }
}

/// Channel to a single node.
pub struct TcpChannel {
    address: NodeAddress,
    connect_timeout: Duration,
    request_timeout: Duration,
    connection: Mutex<Option<Connection>>,
}

impl TcpChannel {
    async fn call<T: DeserializeOwned>(&self, envelope: Envelope) -> Result<T, TransportError> {
        let mut frame = serde_json::to_vec(&envelope)
            .map_err(|e| TransportError::new(Code::InvalidArgument, e.to_string()))?;
        frame.push(b'\n');

        let mut guard = self.connection.lock().await;
        let mut connection = match guard.take() {
            Some(connection) => connection,
            None => Connection::open(&self.address, self.connect_timeout).await?,
        };

        let line = match timeout(self.request_timeout, connection.round_trip(&frame)).await {
            Ok(Ok(line)) => {
                *guard = Some(connection);
                line
            }
            Ok(Err(e)) => {
                tracing::debug!(address = %self.address, error = %e, "Node connection broken");
                return Err(TransportError::unavailable(e.to_string()));
            }
            Err(_) => {
                return Err(TransportError::new(
                    Code::DeadlineExceeded,
                    format!("call to {} timed out", self.address),
                ))
            }
        };
        drop(guard);

        match serde_json::from_str::<Reply<T>>(&line) {
            Ok(Reply::Ok(value)) => Ok(value),
            Ok(Reply::Error(e)) => Err(e),
            Err(e) => Err(TransportError::internal(format!("malformed reply: {}", e))),
        }
    }
}

#[async_trait]
impl Channel for TcpChannel {
    async fn query(&self, request: WireQuery) -> Result<QueryResponse, TransportError> {
        self.call(Envelope::Query(request)).await
    }

    async fn submit_transaction(
        &self,
        request: WireTransaction,
    ) -> Result<SubmitResponse, TransportError> {
        self.call(Envelope::SubmitTransaction(request)).await
    }
}
