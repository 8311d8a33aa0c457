//! Wire messages exchanged with nodes.
//!
//! Bodies are opaque JSON values produced by the per-operation builders;
//! the engine only reads the headers.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Status, TransactionId};

/// Header carried by every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHeader {
    /// Node the query is addressed to.
    pub node_account_id: AccountId,
    /// Payment for the query, when the query is not free.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_transaction_id: Option<TransactionId>,
}

/// A query as sent to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireQuery {
    pub header: QueryHeader,
    pub body: serde_json::Value,
}

/// A transaction as sent to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTransaction {
    pub transaction_id: TransactionId,
    pub node_account_id: AccountId,
    pub body: serde_json::Value,
}

/// Built payload for one attempt, kept for the response decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum WireRequest {
    Query(WireQuery),
    Transaction(WireTransaction),
}

/// Reply to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub precheck: Status,
    #[serde(default)]
    pub cost: u64,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// Reply to a transaction submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub precheck: Status,
    #[serde(default)]
    pub cost: u64,
}

/// Raw reply handed to classifiers and decoders.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Query(QueryResponse),
    Transaction(SubmitResponse),
}

impl Response {
    /// Precheck status regardless of kind.
    pub fn precheck(&self) -> Status {
        match self {
            Response::Query(r) => r.precheck,
            Response::Transaction(r) => r.precheck,
        }
    }
}
