//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! Engine attempt
//!     → Node::channel() (lazily opened via channel.rs Connector)
//!     → Channel::query / Channel::submit_transaction with wire.rs payloads
//!     → Ok(reply)            → application classification
//!     → Err(TransportError)  → code.rs Code inspected by the classifier
//! ```
//!
//! # Design Decisions
//! - The engine sees channels only through the `Channel` trait
//! - Errors carry a canonical status code, never transport-specific types
//! - tcp.rs is the bundled transport; tests plug in scripted channels

pub mod channel;
pub mod code;
pub mod tcp;
pub mod wire;

pub use channel::{Channel, Connector};
pub use code::{Code, TransportError};
pub use tcp::{TcpChannel, TcpConnector};
pub use wire::{
    QueryHeader, QueryResponse, Response, SubmitResponse, WireQuery, WireRequest, WireTransaction,
};
