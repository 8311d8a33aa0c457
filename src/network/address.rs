//! Node network addresses.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::{Host, Url};

/// Errors produced while parsing a node address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid node address '{address}': {reason}")]
    Invalid { address: String, reason: String },
}

impl AddressError {
    fn invalid(address: &str, reason: impl Into<String>) -> Self {
        AddressError::Invalid {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

/// `host:port` of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    host: String,
    port: u16,
}

impl NodeAddress {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for NodeAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(&format!("tcp://{}", s.trim()))
            .map_err(|e| AddressError::invalid(s, e.to_string()))?;

        if !url.username().is_empty() || !url.path().is_empty() || url.query().is_some() {
            return Err(AddressError::invalid(s, "expected host:port"));
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            None => return Err(AddressError::invalid(s, "missing host")),
        };
        let port = url
            .port()
            .ok_or_else(|| AddressError::invalid(s, "missing port"))?;

        Ok(Self { host, port })
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
