//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → Client::from_config builds the network and engine defaults
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the node set changes through
//!   `Network::set_network`, not by mutating config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, validated, ConfigError};
pub use schema::ClientConfig;
pub use schema::ExecutionConfig;
pub use schema::NodeBackoffConfig;
pub use schema::NodeConfig;
pub use schema::ObservabilityConfig;
pub use schema::OperatorConfig;
pub use schema::TransportConfig;
pub use validation::{ValidatedConfig, ValidationError};
