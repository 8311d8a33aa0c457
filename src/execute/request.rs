//! Requests as seen by the engine.
//!
//! A request is either a query or a transaction. Both carry a cursor over
//! candidate nodes; transactions also carry their id sequence. The wire
//! payload for an attempt is always built from the node at the cursor and,
//! for transactions, the current id.

use std::time::Duration;

use crate::execute::error::ExecuteError;
use crate::transport::{QueryHeader, WireQuery, WireRequest, WireTransaction};
use crate::types::{AccountId, TransactionId};

/// Ordered candidate nodes and the position of the next one to use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCursor {
    ids: Vec<AccountId>,
    index: usize,
}

impl NodeCursor {
    pub fn new(ids: Vec<AccountId>) -> Self {
        Self { ids, index: 0 }
    }

    pub fn current(&self) -> Option<AccountId> {
        self.ids.get(self.index).copied()
    }

    /// Move to the next node, wrapping around.
    pub fn advance(&mut self) {
        if !self.ids.is_empty() {
            self.index = (self.index + 1) % self.ids.len();
        }
    }

    pub fn ids(&self) -> &[AccountId] {
        &self.ids
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Transaction ids with a cursor and a lock.
///
/// A multi-part submission carries one id per part; the cursor picks the
/// id the next execution sends. Once locked (the caller depends on a
/// specific id, e.g. it signed it), the engine never replaces an id.
/// Moving the cursor is still allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionIdList {
    ids: Vec<TransactionId>,
    index: usize,
    locked: bool,
}

impl TransactionIdList {
    pub fn current(&self) -> Option<TransactionId> {
        self.ids.get(self.index).copied()
    }

    pub fn ids(&self) -> &[TransactionId] {
        &self.ids
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the next id. Stays put and returns `None` on the last one.
    pub fn advance(&mut self) -> Option<TransactionId> {
        if self.index + 1 >= self.ids.len() {
            return None;
        }
        self.index += 1;
        self.current()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Append an id. The first one pushed becomes current.
    pub fn push(&mut self, id: TransactionId) -> Result<(), ExecuteError> {
        if self.locked {
            return Err(ExecuteError::TransactionIdsLocked);
        }
        self.ids.push(id);
        Ok(())
    }

    /// Replace the id at the cursor, returning the id it replaced.
    pub fn replace_current(&mut self, id: TransactionId) -> Result<Option<TransactionId>, ExecuteError> {
        if self.locked {
            return Err(ExecuteError::TransactionIdsLocked);
        }
        match self.ids.get_mut(self.index) {
            Some(slot) => Ok(Some(std::mem::replace(slot, id))),
            None => {
                self.ids.push(id);
                self.index = self.ids.len() - 1;
                Ok(None)
            }
        }
    }
}

/// Attempt limit of a request that sets none, when the client sets none either.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Per-request retry settings.
///
/// Backoff bounds here win over the client's. The attempt limit only
/// applies when the client has none of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryOverrides {
    pub max_attempts: Option<u32>,
    pub min_backoff: Option<Duration>,
    pub max_backoff: Option<Duration>,
}

/// A query awaiting execution.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    nodes: NodeCursor,
    body: serde_json::Value,
    payment_transaction_id: Option<TransactionId>,
    overrides: RetryOverrides,
}

impl QueryRequest {
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            nodes: NodeCursor::default(),
            body,
            payment_transaction_id: None,
            overrides: RetryOverrides::default(),
        }
    }

    /// Pin the nodes to try, in order.
    pub fn with_node_account_ids(mut self, ids: Vec<AccountId>) -> Self {
        self.nodes = NodeCursor::new(ids);
        self
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        self.nodes.ids()
    }

    pub fn with_payment_transaction_id(mut self, id: TransactionId) -> Self {
        self.payment_transaction_id = Some(id);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.overrides.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_min_backoff(mut self, min_backoff: Duration) -> Self {
        self.overrides.min_backoff = Some(min_backoff);
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.overrides.max_backoff = Some(max_backoff);
        self
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

/// A transaction awaiting submission.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    nodes: NodeCursor,
    body: serde_json::Value,
    transaction_ids: TransactionIdList,
    regenerate_transaction_id: Option<bool>,
    overrides: RetryOverrides,
}

impl TransactionRequest {
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            nodes: NodeCursor::default(),
            body,
            transaction_ids: TransactionIdList::default(),
            regenerate_transaction_id: None,
            overrides: RetryOverrides::default(),
        }
    }

    pub fn with_node_account_ids(mut self, ids: Vec<AccountId>) -> Self {
        self.nodes = NodeCursor::new(ids);
        self
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        self.nodes.ids()
    }

    /// Allow or forbid replacing an expired id. Unset means client default.
    pub fn with_regenerate_transaction_id(mut self, regenerate: bool) -> Self {
        self.regenerate_transaction_id = Some(regenerate);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.overrides.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_min_backoff(mut self, min_backoff: Duration) -> Self {
        self.overrides.min_backoff = Some(min_backoff);
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.overrides.max_backoff = Some(max_backoff);
        self
    }

    /// Pin the transaction id. Locks the id sequence.
    pub fn set_transaction_id(&mut self, id: TransactionId) {
        self.transaction_ids = TransactionIdList {
            ids: vec![id],
            index: 0,
            locked: true,
        };
    }

    /// Append an id the engine may still replace if it expires.
    ///
    /// Ids after the first are sent once the cursor reaches them, see
    /// [`advance_transaction_id`](Self::advance_transaction_id).
    pub fn add_transaction_id(&mut self, id: TransactionId) -> Result<(), ExecuteError> {
        self.transaction_ids.push(id)
    }

    /// Point later executions at the next id, e.g. for the next part of a
    /// multi-part submission. `None` when already on the last id.
    pub fn advance_transaction_id(&mut self) -> Option<TransactionId> {
        self.transaction_ids.advance()
    }

    /// Forbid the engine from replacing the current id.
    pub fn lock_transaction_ids(&mut self) {
        self.transaction_ids.lock();
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_ids.current()
    }

    pub fn transaction_ids(&self) -> &TransactionIdList {
        &self.transaction_ids
    }

    pub(crate) fn transaction_ids_mut(&mut self) -> &mut TransactionIdList {
        &mut self.transaction_ids
    }

    pub fn regenerate_transaction_id(&self) -> Option<bool> {
        self.regenerate_transaction_id
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

/// Anything the engine can execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Query(QueryRequest),
    Transaction(TransactionRequest),
}

impl Request {
    fn nodes(&self) -> &NodeCursor {
        match self {
            Request::Query(q) => &q.nodes,
            Request::Transaction(t) => &t.nodes,
        }
    }

    fn nodes_mut(&mut self) -> &mut NodeCursor {
        match self {
            Request::Query(q) => &mut q.nodes,
            Request::Transaction(t) => &mut t.nodes,
        }
    }

    /// Node the next attempt goes to.
    pub fn node_account_id(&self) -> Option<AccountId> {
        self.nodes().current()
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        self.nodes().ids()
    }

    pub(crate) fn set_node_account_ids(&mut self, ids: Vec<AccountId>) {
        *self.nodes_mut() = NodeCursor::new(ids);
    }

    /// Point the request at its next candidate node.
    pub fn advance(&mut self) {
        self.nodes_mut().advance();
    }

    pub fn overrides(&self) -> RetryOverrides {
        match self {
            Request::Query(q) => q.overrides,
            Request::Transaction(t) => t.overrides,
        }
    }

    pub fn as_transaction(&self) -> Option<&TransactionRequest> {
        match self {
            Request::Transaction(t) => Some(t),
            Request::Query(_) => None,
        }
    }

    pub fn as_transaction_mut(&mut self) -> Option<&mut TransactionRequest> {
        match self {
            Request::Transaction(t) => Some(t),
            Request::Query(_) => None,
        }
    }

    /// Build the wire payload for the current node and id.
    pub fn make_wire(&self) -> Result<WireRequest, ExecuteError> {
        let node_account_id = self.node_account_id().ok_or(ExecuteError::NoNodes)?;

        match self {
            Request::Query(q) => Ok(WireRequest::Query(WireQuery {
                header: QueryHeader {
                    node_account_id,
                    payment_transaction_id: q.payment_transaction_id,
                },
                body: q.body.clone(),
            })),
            Request::Transaction(t) => {
                let transaction_id = t
                    .transaction_ids
                    .current()
                    .ok_or(ExecuteError::MissingTransactionId)?;
                Ok(WireRequest::Transaction(WireTransaction {
                    transaction_id,
                    node_account_id,
                    body: t.body.clone(),
                }))
            }
        }
    }
}

impl From<QueryRequest> for Request {
    fn from(query: QueryRequest) -> Self {
        Request::Query(query)
    }
}

impl From<TransactionRequest> for Request {
    fn from(transaction: TransactionRequest) -> Self {
        Request::Transaction(transaction)
    }
}
