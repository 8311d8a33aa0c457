//! Account identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced while parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input did not have the `shard.realm.num` shape.
    #[error("expected `shard.realm.num`, got '{0}'")]
    Format(String),

    /// One of the components was not a number.
    #[error("invalid number '{part}' in '{input}'")]
    Number { input: String, part: String },
}

/// Identity of an account on the ledger. Nodes are addressed by theirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl AccountId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// Shorthand for the common `0.0.num` form.
    pub const fn from_num(num: u64) -> Self {
        Self::new(0, 0, num)
    }

    pub fn is_zero(&self) -> bool {
        self.shard == 0 && self.realm == 0 && self.num == 0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for AccountId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(ParseError::Format(s.to_string()));
        }

        let mut nums = [0u64; 3];
        for (slot, part) in nums.iter_mut().zip(parts.iter()) {
            *slot = part.parse().map_err(|_| ParseError::Number {
                input: s.to_string(),
                part: part.to_string(),
            })?;
        }

        Ok(Self::new(nums[0], nums[1], nums[2]))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
