//! Ledger identity and status types.
//!
//! # Data Flow
//! ```text
//! Config / caller input
//!     → account_id.rs (parse "shard.realm.num")
//!     → transaction_id.rs (payer + backdated valid start)
//!
//! Node replies
//!     → status.rs (precheck code carried in every response header)
//! ```
//!
//! # Design Decisions
//! - Identities are small `Copy` values, cheap to pass through the engine
//! - All types serialize as the strings users already see in logs

pub mod account_id;
pub mod status;
pub mod transaction_id;

pub use account_id::{AccountId, ParseError};
pub use status::Status;
pub use transaction_id::TransactionId;
