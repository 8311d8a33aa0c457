//! Execution subsystem.
//!
//! # Data Flow
//! ```text
//! Caller builds QueryRequest / TransactionRequest
//!     → request.rs Request (node cursor, transaction id sequence)
//!     → engine.rs Client::execute with an operation.rs Operation
//!         → network pool, channel, classifier, backoff
//!     → Operation::map_response → typed result
//!     → or error.rs ExecuteError ("retry N/max: cause")
//! ```
//!
//! # Design Decisions
//! - The engine is a sequential loop; concurrency comes from callers
//!   running many executions against one shared `Client`
//! - Classification and decoding are strategy values, one per operation
//! - The request is borrowed mutably for the whole execution, so cursor
//!   moves and id regeneration can't race with readers

pub mod engine;
pub mod error;
pub mod operation;
pub mod request;

pub use engine::RetryPolicy;
pub use error::ExecuteError;
pub use operation::{Operation, QueryOperation, QueryOutcome, SubmitOperation, TransactionResponse};
pub use request::{
    NodeCursor, QueryRequest, Request, RetryOverrides, TransactionIdList, TransactionRequest,
    DEFAULT_MAX_ATTEMPTS,
};
