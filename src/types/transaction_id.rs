//! Transaction identifiers.
//!
//! A transaction id is the payer account plus the instant from which the
//! transaction is valid. Nodes reject a submission whose valid start has
//! drifted outside their window with `TRANSACTION_EXPIRED`, which is why
//! the engine may replace an id with a freshly generated one.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::AccountId;

/// Lower bound of the random backdating window, in milliseconds.
const BACKDATE_MIN_MS: u64 = 5_000;
/// Upper bound of the random backdating window, in milliseconds.
const BACKDATE_MAX_MS: u64 = 8_000;

/// Unique identity of one transaction submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start_seconds: u64,
    pub valid_start_nanos: u32,
}

impl TransactionId {
    pub fn new(account_id: AccountId, valid_start: SystemTime) -> Self {
        let since_epoch = valid_start
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Self {
            account_id,
            valid_start_seconds: since_epoch.as_secs(),
            valid_start_nanos: since_epoch.subsec_nanos(),
        }
    }

    /// Generate a new id for `account_id`.
    ///
    /// The valid start is pushed a few seconds into the past so a node whose
    /// clock runs slightly behind ours still accepts it.
    pub fn generate(account_id: AccountId) -> Self {
        let backdate_ms = rand::thread_rng().gen_range(BACKDATE_MIN_MS..BACKDATE_MAX_MS);
        let backdate = Duration::from_millis(backdate_ms)
            + Duration::from_nanos(rand::thread_rng().gen_range(0..1_000_000));
        let valid_start = SystemTime::now()
            .checked_sub(backdate)
            .unwrap_or(UNIX_EPOCH);
        Self::new(account_id, valid_start)
    }

    pub fn valid_start(&self) -> SystemTime {
        UNIX_EPOCH
            + Duration::from_secs(self.valid_start_seconds)
            + Duration::from_nanos(self.valid_start_nanos as u64)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id, self.valid_start_seconds, self.valid_start_nanos
        )
    }
}
