//! Channel and connector abstractions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::network::NodeAddress;
use crate::transport::code::TransportError;
use crate::transport::wire::{QueryResponse, SubmitResponse, WireQuery, WireTransaction};

/// An open communication handle to one node.
///
/// Exposes one call per request kind. Implementations must be safe to share
/// between concurrent executions.
#[async_trait]
pub trait Channel: Send + Sync {
    async fn query(&self, request: WireQuery) -> Result<QueryResponse, TransportError>;

    async fn submit_transaction(
        &self,
        request: WireTransaction,
    ) -> Result<SubmitResponse, TransportError>;
}

/// Opens channels to node addresses.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, address: &NodeAddress) -> Result<Arc<dyn Channel>, TransportError>;
}
