//! The execution engine.
//!
//! # Attempt Loop
//! ```text
//! for attempt in 0..max_attempts:
//!     build wire payload, resolve node     (unknown node → InvalidNodeSet, no retry)
//!     mark node in use; wait out its penalty if unhealthy
//!     advance request cursor               (next attempt targets the next node)
//!     open channel                         (failure → penalize node, next attempt)
//!     call                                 (transient error → penalize node, next attempt;
//!                                           other error → abort)
//!     reward node; classify reply
//!         Retry    → remember error, sleep backoff(attempt), next attempt
//!         Expired  → regenerate transaction id and go again, or abort
//!         Error    → abort
//!         Finished → decode and return
//! exhausted → last error, annotated "retry N/max"
//! ```

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::client::Client;
use crate::execute::error::ExecuteError;
use crate::execute::operation::{
    Operation, QueryOperation, QueryOutcome, SubmitOperation, TransactionResponse,
};
use crate::execute::request::{QueryRequest, Request, TransactionRequest, DEFAULT_MAX_ATTEMPTS};
use crate::observability::ExecutionEvent;
use crate::resilience::{delay_for_attempt, is_transient, ExecutionState};
use crate::transport::{Channel, Response, TransportError, WireRequest};
use crate::types::TransactionId;

/// Attempt and backoff bounds for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Client {
    /// A client attempt limit wins over the request's; backoff bounds come
    /// from the request first. At least one attempt.
    pub fn retry_policy(&self, request: &Request) -> RetryPolicy {
        let overrides = request.overrides();
        let max_attempts = self
            .max_attempts()
            .or(overrides.max_attempts)
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            min_backoff: overrides.min_backoff.unwrap_or(self.min_backoff()),
            max_backoff: overrides.max_backoff.unwrap_or(self.max_backoff()),
        }
    }

    /// Execute a query with the default query status table.
    pub async fn query(&self, request: QueryRequest) -> Result<QueryOutcome, ExecuteError> {
        let mut request = Request::from(request);
        self.execute(&mut request, &QueryOperation).await
    }

    /// Submit a transaction with the default transaction status table.
    ///
    /// The request is borrowed so callers can inspect the transaction id
    /// that was finally used.
    pub async fn submit(
        &self,
        request: &mut TransactionRequest,
    ) -> Result<TransactionResponse, ExecuteError> {
        let mut wrapped = Request::Transaction(request.clone());
        let result = self.execute(&mut wrapped, &SubmitOperation).await;
        if let Request::Transaction(updated) = wrapped {
            *request = updated;
        }
        result
    }

    /// Run `request` against the network until `operation` is satisfied,
    /// rejects it, or the attempts run out.
    ///
    /// Nodes the client picks for a request that pinned none are dropped
    /// again afterwards, so the next execution picks from current health.
    pub async fn execute<O: Operation>(
        &self,
        request: &mut Request,
        operation: &O,
    ) -> Result<O::Output, ExecuteError> {
        let pinned = !request.node_account_ids().is_empty();
        let result = self.run(request, operation).await;
        if !pinned {
            request.set_node_account_ids(Vec::new());
        }
        result
    }

    async fn run<O: Operation>(
        &self,
        request: &mut Request,
        operation: &O,
    ) -> Result<O::Output, ExecuteError> {
        let request_id = Uuid::new_v4();

        if let Err(e) = self.prepare(request) {
            return Err(self.fail(request_id, 0, e));
        }

        let policy = self.retry_policy(request);
        let mut last_error: Option<ExecuteError> = None;

        for attempt in 0..policy.max_attempts {
            let attempts = attempt + 1;

            let wire = match request.make_wire() {
                Ok(wire) => wire,
                Err(e) => return Err(self.fail(request_id, attempts, e)),
            };
            let node_id = match request.node_account_id() {
                Some(id) => id,
                None => return Err(self.fail(request_id, attempts, ExecuteError::NoNodes)),
            };
            let node = match self.network().resolve(&node_id) {
                Some(node) => node,
                None => {
                    return Err(self.fail(request_id, attempts, ExecuteError::InvalidNodeSet(node_id)))
                }
            };

            node.mark_in_use();
            self.observe(
                request_id,
                ExecutionEvent::NodeSelected {
                    attempt: attempts,
                    node: node_id,
                    address: node.address().clone(),
                },
            );

            if !node.is_healthy() {
                let wait = node.wait_remaining();
                self.observe(request_id, ExecutionEvent::NodeUnhealthy { node: node_id, wait });
                tokio::time::sleep(wait).await;
            }

            request.advance();

            let channel = match node.channel().await {
                Ok(channel) => channel,
                Err(e) => {
                    node.increase_delay();
                    self.observe(
                        request_id,
                        ExecutionEvent::ChannelFailed {
                            node: node_id,
                            error: e.clone(),
                        },
                    );
                    last_error = Some(ExecuteError::Transport(e));
                    continue;
                }
            };

            let response = match call(channel, &wire).await {
                Ok(response) => response,
                Err(e) => {
                    let transient = is_transient(&e);
                    self.observe(
                        request_id,
                        ExecutionEvent::TransportFailed {
                            node: node_id,
                            error: e.clone(),
                            transient,
                        },
                    );
                    if transient {
                        node.increase_delay();
                        last_error = Some(ExecuteError::Transport(e));
                        continue;
                    }
                    return Err(self.fail(
                        request_id,
                        attempts,
                        ExecuteError::Transport(e).after_attempts(attempts, policy.max_attempts),
                    ));
                }
            };

            node.decrease_delay();

            let state = operation.should_retry(request, &response);
            self.observe(
                request_id,
                ExecutionEvent::Classified {
                    node: node_id,
                    status: response.precheck(),
                    state,
                },
            );

            match state {
                ExecutionState::Retry => {
                    last_error = Some(operation.map_status_error(request, &response));
                    if attempts < policy.max_attempts {
                        let delay =
                            delay_for_attempt(attempt, policy.min_backoff, policy.max_backoff);
                        self.observe(
                            request_id,
                            ExecutionEvent::Backoff {
                                attempt: attempts,
                                delay,
                            },
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                ExecutionState::Expired => {
                    let error = operation.map_status_error(request, &response);
                    match self.regenerate_transaction_id_for(request) {
                        Some((previous, next)) => {
                            self.observe(request_id, ExecutionEvent::Regenerated { previous, next });
                            last_error = Some(error);
                        }
                        None => {
                            return Err(self.fail(
                                request_id,
                                attempts,
                                error.after_attempts(attempts, policy.max_attempts),
                            ))
                        }
                    }
                }
                ExecutionState::Error => {
                    let error = operation.map_status_error(request, &response);
                    return Err(self.fail(
                        request_id,
                        attempts,
                        error.after_attempts(attempts, policy.max_attempts),
                    ));
                }
                ExecutionState::Finished => {
                    self.observe(
                        request_id,
                        ExecutionEvent::Finished {
                            node: node_id,
                            attempts,
                        },
                    );
                    return operation.map_response(request, response, node_id, wire);
                }
            }
        }

        let error = last_error
            .unwrap_or(ExecuteError::NoAttempts)
            .after_attempts(policy.max_attempts, policy.max_attempts);
        Err(self.fail(request_id, policy.max_attempts, error))
    }

    /// Fill in what the caller left for the client to choose: the node list
    /// and, for transactions, the first transaction id.
    fn prepare(&self, request: &mut Request) -> Result<(), ExecuteError> {
        if request.node_account_ids().is_empty() {
            let nodes = self.network().select_nodes(self.max_nodes_per_request());
            if nodes.is_empty() {
                return Err(ExecuteError::NoNodes);
            }
            request.set_node_account_ids(nodes);
        }

        let operator = self.operator();
        if let Some(transaction) = request.as_transaction_mut() {
            if transaction.transaction_id().is_none() {
                let operator = operator.ok_or(ExecuteError::MissingTransactionId)?;
                transaction.add_transaction_id(TransactionId::generate(operator))?;
            }
        }

        Ok(())
    }

    /// Replace an expired transaction id when the operator, the request and
    /// the id lock all allow it. Returns `(previous, next)` on success.
    fn regenerate_transaction_id_for(
        &self,
        request: &mut Request,
    ) -> Option<(TransactionId, TransactionId)> {
        let operator = self.operator()?;
        let transaction = request.as_transaction_mut()?;

        let allowed = transaction
            .regenerate_transaction_id()
            .unwrap_or(self.regenerate_transaction_id());
        if !allowed || transaction.transaction_ids().is_locked() {
            return None;
        }

        let next = TransactionId::generate(operator);
        match transaction.transaction_ids_mut().replace_current(next) {
            Ok(Some(previous)) => Some((previous, next)),
            Ok(None) | Err(_) => None,
        }
    }

    fn observe(&self, request_id: Uuid, event: ExecutionEvent) {
        self.observer().record(request_id, &event);
    }

    fn fail(&self, request_id: Uuid, attempts: u32, error: ExecuteError) -> ExecuteError {
        self.observe(
            request_id,
            ExecutionEvent::Failed {
                attempts,
                error: error.to_string(),
            },
        );
        error
    }
}

async fn call(channel: Arc<dyn Channel>, wire: &WireRequest) -> Result<Response, TransportError> {
    match wire {
        WireRequest::Query(query) => channel.query(query.clone()).await.map(Response::Query),
        WireRequest::Transaction(transaction) => channel
            .submit_transaction(transaction.clone())
            .await
            .map(Response::Transaction),
    }
}
