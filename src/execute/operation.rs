//! Per-operation strategy supplied to the engine.
//!
//! Each operation kind decides how a node's reply is classified, how a
//! rejection becomes an error, and how a successful reply is decoded. The
//! engine owns everything else.

use crate::execute::error::ExecuteError;
use crate::execute::request::Request;
use crate::resilience::classifier::{query_should_retry, transaction_should_retry};
use crate::resilience::ExecutionState;
use crate::transport::{QueryResponse, Response, WireRequest};
use crate::types::{AccountId, TransactionId};

/// Classification and decoding for one kind of request.
pub trait Operation: Send + Sync {
    type Output;

    /// Map a well-formed reply to what the engine does next.
    fn should_retry(&self, request: &Request, response: &Response) -> ExecutionState;

    /// Error reported for a reply classified as anything but `Finished`.
    fn map_status_error(&self, request: &Request, response: &Response) -> ExecuteError;

    /// Decode a finished reply. `node` served it; `wire` is what was sent.
    fn map_response(
        &self,
        request: &Request,
        response: Response,
        node: AccountId,
        wire: WireRequest,
    ) -> Result<Self::Output, ExecuteError>;
}

/// Result of a query, with the node that answered.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub node_id: AccountId,
    pub response: QueryResponse,
}

/// Result of a transaction submission.
///
/// `node_id` is needed to poll the same node for the receipt later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    pub node_id: AccountId,
}

/// Generic query path using the default query status table.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryOperation;

impl Operation for QueryOperation {
    type Output = QueryOutcome;

    fn should_retry(&self, _request: &Request, response: &Response) -> ExecutionState {
        query_should_retry(response.precheck())
    }

    fn map_status_error(&self, _request: &Request, response: &Response) -> ExecuteError {
        ExecuteError::QueryStatus {
            status: response.precheck(),
        }
    }

    fn map_response(
        &self,
        _request: &Request,
        response: Response,
        node: AccountId,
        _wire: WireRequest,
    ) -> Result<Self::Output, ExecuteError> {
        match response {
            Response::Query(response) => Ok(QueryOutcome {
                node_id: node,
                response,
            }),
            Response::Transaction(_) => Err(ExecuteError::Decode(
                "expected a query response, got a submission response".to_string(),
            )),
        }
    }
}

/// Generic transaction submission using the default transaction table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubmitOperation;

impl Operation for SubmitOperation {
    type Output = TransactionResponse;

    fn should_retry(&self, _request: &Request, response: &Response) -> ExecutionState {
        transaction_should_retry(response.precheck())
    }

    fn map_status_error(&self, request: &Request, response: &Response) -> ExecuteError {
        match request.as_transaction().and_then(|t| t.transaction_id()) {
            Some(transaction_id) => ExecuteError::PrecheckStatus {
                status: response.precheck(),
                transaction_id,
            },
            None => ExecuteError::MissingTransactionId,
        }
    }

    fn map_response(
        &self,
        _request: &Request,
        response: Response,
        node: AccountId,
        wire: WireRequest,
    ) -> Result<Self::Output, ExecuteError> {
        match (response, wire) {
            (Response::Transaction(_), WireRequest::Transaction(sent)) => Ok(TransactionResponse {
                transaction_id: sent.transaction_id,
                node_id: node,
            }),
            _ => Err(ExecuteError::Decode(
                "expected a submission response for a transaction".to_string(),
            )),
        }
    }
}
