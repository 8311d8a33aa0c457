//! Node and network subsystem.
//!
//! # Data Flow
//! ```text
//! ClientConfig.network
//!     → address.rs (validate host:port)
//!     → pool.rs Network (AccountId → Arc<Node>)
//!
//! Engine attempt
//!     → Network::resolve(request's current node id)
//!     → node.rs Node (health check, lazily opened channel)
//!     → increase_delay / decrease_delay from the call outcome
//! ```
//!
//! # Design Decisions
//! - Nodes are owned by the pool and shared as `Arc<Node>`; health is only
//!   mutated through `Node` methods behind a mutex
//! - Unhealthy nodes are waited on, not skipped
//! - The node set is swapped atomically (arc-swap), readers never block

pub mod address;
pub mod node;
pub mod pool;

pub use address::{AddressError, NodeAddress};
pub use node::{Node, NodeBackoff};
pub use pool::Network;
