//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (policy invariants)
//!     → ServerConfig (validated, immutable)
//!     → policy compiled into the interceptor at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    KeyPinningPolicy, ListenerConfig, Mode, ObservabilityConfig, PolicyConfiguration,
    ServerConfig, TransportSecurityPolicy,
};
pub use validation::{validate_policy, PolicyError, PolicyKind};
