//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check node ids and addresses parse, and ids are unique
//! - Validate value ranges (attempts > 0, min backoff <= max backoff)
//! - Metrics address must be `ip:port` when metrics are enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - `parse_validated` hands back the parsed ids and addresses so callers
//!   never re-parse (and never unwrap) what was already checked

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::ClientConfig;
use crate::network::NodeAddress;
use crate::types::AccountId;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Typed view of the parts of a config that need parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub nodes: Vec<(AccountId, NodeAddress)>,
    pub operator: Option<AccountId>,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    parse_validated(config).map(|_| ())
}

/// Validate and return the typed node set and operator.
pub fn parse_validated(config: &ClientConfig) -> Result<ValidatedConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut nodes = Vec::with_capacity(config.network.len());
    let mut operator = None;

    if config.network.is_empty() {
        errors.push(ValidationError::new("network", "at least one node is required"));
    }

    let mut seen = HashSet::new();
    for (i, node) in config.network.iter().enumerate() {
        let account_id = match node.account_id.parse::<AccountId>() {
            Ok(id) => {
                if !seen.insert(id) {
                    errors.push(ValidationError::new(
                        format!("network[{}].account_id", i),
                        format!("duplicate node {}", id),
                    ));
                }
                Some(id)
            }
            Err(e) => {
                errors.push(ValidationError::new(
                    format!("network[{}].account_id", i),
                    e.to_string(),
                ));
                None
            }
        };

        let address = match node.address.parse::<NodeAddress>() {
            Ok(address) => Some(address),
            Err(e) => {
                errors.push(ValidationError::new(
                    format!("network[{}].address", i),
                    e.to_string(),
                ));
                None
            }
        };

        if let (Some(account_id), Some(address)) = (account_id, address) {
            nodes.push((account_id, address));
        }
    }

    if config.execution.max_attempts == Some(0) {
        errors.push(ValidationError::new(
            "execution.max_attempts",
            "must be greater than zero",
        ));
    }
    if config.execution.min_backoff_ms > config.execution.max_backoff_ms {
        errors.push(ValidationError::new(
            "execution.min_backoff_ms",
            "must not exceed max_backoff_ms",
        ));
    }
    if config.node_backoff.min_backoff_ms > config.node_backoff.max_backoff_ms {
        errors.push(ValidationError::new(
            "node_backoff.min_backoff_ms",
            "must not exceed max_backoff_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address (ip:port)",
        ));
    }

    if let Some(configured) = &config.operator {
        match configured.account_id.parse::<AccountId>() {
            Ok(id) => operator = Some(id),
            Err(e) => errors.push(ValidationError::new("operator.account_id", e.to_string())),
        }
    }

    if errors.is_empty() {
        Ok(ValidatedConfig { nodes, operator })
    } else {
        Err(errors)
    }
}
