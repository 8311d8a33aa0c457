//! Precheck and application status codes returned by nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result code a node attaches to every query and submission reply.
///
/// Codes this crate never branches on collapse into `Unknown` when
/// deserialized, so new node versions don't break decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    Busy,
    PlatformNotActive,
    PlatformTransactionNotCreated,
    TransactionExpired,
    InvalidTransaction,
    InvalidTransactionStart,
    InvalidSignature,
    InsufficientPayerBalance,
    InsufficientTxFee,
    InvalidNodeAccount,
    DuplicateTransaction,
    PayerAccountNotFound,
    InvalidAccountId,
    NotSupported,
    #[serde(other)]
    Unknown,
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the wire spelling so logs match what nodes send.
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(s)) => f.write_str(&s),
            _ => write!(f, "{:?}", self),
        }
    }
}
