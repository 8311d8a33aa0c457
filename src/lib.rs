//! Ledger dispatch: the client-side execution engine for a ledger network.
//!
//! Turns a query or transaction into calls against the network's nodes,
//! classifies each outcome, and retries, regenerates or fails within a
//! bounded number of attempts.
//!
//! # Architecture Overview
//!
//! ```text
//!   QueryRequest / TransactionRequest
//!            │
//!            ▼
//!   ┌──────────────────┐     ┌────────────────┐     ┌──────────────┐
//!   │ execute::engine  │────▶│ network::pool  │────▶│ network::node│
//!   │  (attempt loop)  │     │ (id → Node)    │     │ health+chan  │
//!   └───────┬──────────┘     └────────────────┘     └──────┬───────┘
//!           │                                              │
//!           ▼                                              ▼
//!   ┌──────────────────┐                           ┌──────────────┐
//!   │   resilience     │                           │  transport   │
//!   │ backoff+classify │                           │ Channel/TCP  │
//!   └──────────────────┘                           └──────────────┘
//!
//!   Cross-cutting: config (TOML/JSON), observability (observer, tracing, metrics)
//! ```

// Core
pub mod client;
pub mod execute;
pub mod network;
pub mod transport;
pub mod types;

// Cross-cutting concerns
pub mod config;
pub mod observability;
pub mod resilience;

pub use client::Client;
pub use config::ClientConfig;
pub use execute::{
    ExecuteError, Operation, QueryOperation, QueryOutcome, QueryRequest, Request, SubmitOperation,
    TransactionRequest, TransactionResponse,
};
pub use resilience::ExecutionState;
pub use types::{AccountId, Status, TransactionId};
