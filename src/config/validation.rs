//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and value ranges (timeouts > 0, ports valid)
//! - Detect duplicate dependency names and clashes with the database probe
//! - Keep every probe timeout below the request timeout, so `/health`
//!   always answers with a report
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{PeerConfig, ServiceConfig};
use crate::lifecycle::startup::DATABASE_DEPENDENCY;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem, reported as `field: message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
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

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ValidationError::new("service.name", "must not be empty"));
    }
    if config.service.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "service.bind_address",
            format!("invalid socket address '{}'", config.service.bind_address),
        ));
    }
    let request_timeout = config.service.request_timeout_secs;
    if request_timeout == 0 {
        errors.push(ValidationError::new("service.request_timeout_secs", "must be greater than 0"));
    }

    if config.database.enabled {
        if config.database.port == 0 {
            errors.push(ValidationError::new("database.port", "must be greater than 0"));
        }
        if config.database.host.is_empty() {
            errors.push(ValidationError::new("database.host", "must not be empty"));
        }
        if config.database.connect_timeout_secs == 0 {
            errors.push(ValidationError::new("database.connect_timeout_secs", "must be greater than 0"));
        } else if request_timeout > 0 && config.database.connect_timeout_secs >= request_timeout {
            errors.push(below_request_timeout("database.connect_timeout_secs", request_timeout));
        }
    }

    validate_peers("peers", &config.peers, &mut errors);
    for (i, peer) in config.peers.iter().enumerate() {
        if config.database.enabled && peer.name == DATABASE_DEPENDENCY {
            errors.push(ValidationError::new(
                format!("peers[{i}].name"),
                format!("'{DATABASE_DEPENDENCY}' is reserved for the database probe"),
            ));
        }
        if config.health.probe_peers
            && request_timeout > 0
            && peer.timeout_secs > 0
            && peer.timeout_secs >= request_timeout
        {
            errors.push(below_request_timeout(&format!("peers[{i}].timeout_secs"), request_timeout));
        }
    }
    validate_peers("cli.services", &config.cli.services, &mut errors);

    if config.cli.timeout_secs == 0 {
        errors.push(ValidationError::new("cli.timeout_secs", "must be greater than 0"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("expected one of {}", LOG_LEVELS.join(", ")),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn below_request_timeout(field: &str, request_timeout: u64) -> ValidationError {
    ValidationError::new(
        field,
        format!("must be less than service.request_timeout_secs ({request_timeout})"),
    )
}

fn validate_peers(section: &str, peers: &[PeerConfig], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();

    for (i, peer) in peers.iter().enumerate() {
        let field = format!("{section}[{i}]");

        if peer.name.trim().is_empty() {
            errors.push(ValidationError::new(format!("{field}.name"), "must not be empty"));
        } else if !seen.insert(peer.name.as_str()) {
            errors.push(ValidationError::new(
                format!("{field}.name"),
                format!("duplicate name '{}'", peer.name),
            ));
        }

        match Url::parse(&peer.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                format!("{field}.url"),
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(format!("{field}.url"), e.to_string())),
        }

        if peer.timeout_secs == 0 {
            errors.push(ValidationError::new(format!("{field}.timeout_secs"), "must be greater than 0"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(name: &str, url: &str) -> PeerConfig {
        PeerConfig {
            name: name.to_string(),
            url: url.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.service.name = String::new();
        config.service.bind_address = "not-an-address".into();
        config.observability.log_level = "verbose".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["service.name", "service.bind_address", "observability.log_level"]);
    }

    #[test]
    fn test_rejects_duplicate_and_invalid_peers() {
        let mut config = ServiceConfig::default();
        config.peers = vec![
            peer("user-service", "http://localhost:3001/health"),
            peer("user-service", "http://localhost:3002/health"),
            peer("ftp", "ftp://localhost/health"),
            peer("broken", "not a url"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].to_string(), "peers[1].name: duplicate name 'user-service'");
        assert_eq!(errors[1].field, "peers[2].url");
        assert_eq!(errors[2].field, "peers[3].url");
    }

    #[test]
    fn test_probe_timeouts_must_fit_request_timeout() {
        let mut config = ServiceConfig::default();
        config.service.request_timeout_secs = 5;
        config.database.connect_timeout_secs = 5;
        config.health.probe_peers = true;
        config.peers = vec![
            peer("user-service", "http://localhost:3001/health"),
            PeerConfig {
                timeout_secs: 4,
                ..peer("post-service", "http://localhost:3002/health")
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["database.connect_timeout_secs", "peers[0].timeout_secs"]);
        assert_eq!(
            errors[1].message,
            "must be less than service.request_timeout_secs (5)"
        );
    }

    #[test]
    fn test_unprobed_peer_timeouts_are_not_compared() {
        let mut config = ServiceConfig::default();
        config.service.request_timeout_secs = 5;
        config.database.enabled = false;
        config.peers = vec![PeerConfig {
            timeout_secs: 10,
            ..peer("user-service", "http://localhost:3001/health")
        }];

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_peer_cannot_shadow_database() {
        let mut config = ServiceConfig::default();
        config.peers = vec![peer("database", "http://localhost:3001/health")];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "peers[0].name: 'database' is reserved for the database probe"
        );

        config.database.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_disabled_database_is_not_checked() {
        let mut config = ServiceConfig::default();
        config.database.enabled = false;
        config.database.port = 0;

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
