//! Execution errors.

use thiserror::Error;

use crate::transport::TransportError;
use crate::types::{AccountId, Status, TransactionId};

/// Errors returned by the execution engine.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The request points at a node outside the configured network.
    #[error("invalid node account id set: node {0} is not part of the network")]
    InvalidNodeSet(AccountId),

    /// Neither the request nor the network offers a node.
    #[error("no nodes available to execute against")]
    NoNodes,

    /// A transaction without an id, and no operator to generate one.
    #[error("transaction has no transaction id and no operator is configured")]
    MissingTransactionId,

    /// The transaction id sequence was locked by the caller.
    #[error("transaction ids are locked and cannot be replaced")]
    TransactionIdsLocked,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A node rejected a transaction.
    #[error("exceptional precheck status {status} received for transaction {transaction_id}")]
    PrecheckStatus {
        status: Status,
        transaction_id: TransactionId,
    },

    /// A node rejected a query.
    #[error("exceptional precheck status {status} received for query")]
    QueryStatus { status: Status },

    /// The reply could not be turned into the expected result.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The loop ended without any attempt producing an error to report.
    #[error("no attempts were made")]
    NoAttempts,

    /// A failure annotated with how many attempts were spent.
    #[error("retry {attempts}/{max_attempts}: {source}")]
    Attempts {
        attempts: u32,
        max_attempts: u32,
        source: Box<ExecuteError>,
    },
}

impl ExecuteError {
    pub(crate) fn after_attempts(self, attempts: u32, max_attempts: u32) -> Self {
        ExecuteError::Attempts {
            attempts,
            max_attempts,
            source: Box::new(self),
        }
    }

    /// The underlying cause, with attempt annotations stripped.
    pub fn root(&self) -> &ExecuteError {
        match self {
            ExecuteError::Attempts { source, .. } => source.root(),
            other => other,
        }
    }

    /// Node status behind this error, if a node rejected the request.
    pub fn status(&self) -> Option<Status> {
        match self.root() {
            ExecuteError::PrecheckStatus { status, .. } | ExecuteError::QueryStatus { status } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// `(attempts, max_attempts)` when the error carries them.
    pub fn attempts(&self) -> Option<(u32, u32)> {
        match self {
            ExecuteError::Attempts {
                attempts,
                max_attempts,
                ..
            } => Some((*attempts, *max_attempts)),
            _ => None,
        }
    }

    /// True for errors caused by client or request setup rather than nodes.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.root(),
            ExecuteError::InvalidNodeSet(_)
                | ExecuteError::NoNodes
                | ExecuteError::MissingTransactionId
                | ExecuteError::TransactionIdsLocked
        )
    }
}
