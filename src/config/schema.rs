//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a service's
//! health subsystem. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

use crate::health::StatusPolicy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Identity and listener of the service reporting its health.
    pub service: ServiceSection,

    /// Database probed as the `database` dependency.
    pub database: DatabaseConfig,

    /// Peer HTTP services this service depends on.
    pub peers: Vec<PeerConfig>,

    /// Aggregation settings.
    pub health: HealthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Settings for the standalone `health-cli`.
    pub cli: CliConfig,
}

/// Service identity and listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Name reported in the `service` field.
    pub name: String,

    /// Version reported in the `version` field.
    pub version: String,

    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: "api-gateway".to_string(),
            version: crate::health::registry::DEFAULT_VERSION.to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// PostgreSQL connection settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Register the database probe.
    pub enabled: bool,

    pub host: String,

    pub port: u16,

    /// Database name.
    pub name: String,

    pub user: String,

    pub password: String,

    /// Upper bound for acquiring a connection during a check.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "localhost".to_string(),
            port: 5432,
            name: "groupomania".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            connect_timeout_secs: 5,
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("enabled", &self.enabled)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// A peer HTTP service checked through its health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeerConfig {
    /// Dependency name (key in the `dependencies` map).
    pub name: String,

    /// Health endpoint URL (e.g., "http://localhost:3001/health").
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_peer_timeout")]
    pub timeout_secs: u64,
}

fn default_peer_timeout() -> u64 {
    5
}

/// Aggregation settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HealthConfig {
    /// How probe results fold into the overall status.
    pub policy: StatusPolicy,

    /// Actively GET each peer's health endpoint. When false, peers are
    /// registered with a probe that always reports healthy.
    pub probe_peers: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Standalone health-check CLI settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CliConfig {
    /// Services to poll. Empty means the gateway/user/post defaults.
    pub services: Vec<PeerConfig>,

    /// Per-check timeout in seconds.
    pub timeout_secs: u64,

    /// Include the database check.
    pub check_database: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            services: Vec::new(),
            timeout_secs: 5,
            check_database: true,
        }
    }
}
