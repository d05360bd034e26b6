//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated config into a populated health registry
//! - Register the database probe and one probe per peer service
//!
//! # Design Decisions
//! - Fail fast: an unusable peer URL is a startup error
//! - The database pool connects lazily, so startup never waits on it
//! - Registration completes before the listener is bound

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::ServiceConfig;
use crate::health::{ConnectivityProbe, HealthRegistry, NoopProbe, PeerServiceProbe, PgConnectivity};

/// Dependency name of the database probe.
pub const DATABASE_DEPENDENCY: &str = "database";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid URL for peer '{name}': {source}")]
    PeerUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },
}

/// Build the registry described by `config`.
pub fn build_registry(config: &ServiceConfig) -> Result<HealthRegistry, StartupError> {
    let mut registry = HealthRegistry::new(&config.service.name, &config.service.version)
        .with_policy(config.health.policy);

    if config.database.enabled {
        let connectivity = PgConnectivity::connect_lazy(&config.database);
        registry.add_dependency(DATABASE_DEPENDENCY, ConnectivityProbe::new(connectivity));
    }

    for peer in &config.peers {
        if config.health.probe_peers {
            let url = Url::parse(&peer.url).map_err(|source| StartupError::PeerUrl {
                name: peer.name.clone(),
                source,
            })?;
            let timeout = Duration::from_secs(peer.timeout_secs);
            registry.add_dependency(&peer.name, PeerServiceProbe::new(url, timeout));
        } else {
            registry.add_dependency(&peer.name, NoopProbe);
        }
    }

    tracing::info!(
        service = %registry.service(),
        version = %registry.version(),
        policy = ?registry.policy(),
        dependencies = ?registry.names().collect::<Vec<_>>(),
        "Health registry built"
    );

    Ok(registry)
}
