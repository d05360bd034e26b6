//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: DB_*, LOG_LEVEL, SERVICE_*)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → startup builds the health registry from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the registry is built from it once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    CliConfig, DatabaseConfig, HealthConfig, LogFormat, ObservabilityConfig, PeerConfig,
    ServiceConfig, ServiceSection,
};
pub use validation::ValidationError;
