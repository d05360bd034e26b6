//! Health registry.
//!
//! Owned by the service bootstrap: built once at startup, then shared
//! read-only (`Arc<HealthRegistry>`) with the HTTP layer. Registration takes
//! `&mut self`, so it cannot overlap a running check.

use std::time::Instant;

use chrono::Utc;

use crate::health::aggregator::{settle_all, NamedProbe, StatusPolicy};
use crate::health::probe::Probe;
use crate::health::report::{HealthReport, OverallStatus};
use crate::observability::metrics;

/// Version reported when the service does not configure one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Named collection of probes for one service instance.
pub struct HealthRegistry {
    service: String,
    version: String,
    started_at: Instant,
    policy: StatusPolicy,
    dependencies: Vec<NamedProbe>,
}

impl HealthRegistry {
    pub fn new(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
            started_at: Instant::now(),
            policy: StatusPolicy::default(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the instant uptime is measured from.
    pub fn with_start_time(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    /// Register `probe` under `name`, replacing any probe already there.
    ///
    /// A replaced probe keeps its original position. Empty names are ignored.
    pub fn add_dependency<P>(&mut self, name: impl Into<String>, probe: P)
    where
        P: Probe + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            tracing::warn!("Ignoring health dependency with an empty name");
            return;
        }

        match self.dependencies.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                tracing::debug!(dependency = %name, "Replacing health dependency");
                entry.1 = Box::new(probe);
            }
            None => {
                tracing::debug!(dependency = %name, "Registering health dependency");
                self.dependencies.push((name, Box::new(probe)));
            }
        }
    }

    /// Probe every dependency and fold the results into one report.
    pub async fn check_health(&self) -> HealthReport {
        let results = settle_all(&self.dependencies).await;
        let status = self.policy.derive(results.iter().map(|(_, result)| result));

        metrics::record_health_check(status);
        if status != OverallStatus::Healthy {
            tracing::info!(service = %self.service, status = %status, "Health check not healthy");
        }

        HealthReport {
            status,
            timestamp: Utc::now(),
            uptime: self.started_at.elapsed().as_secs_f64(),
            version: self.version.clone(),
            service: self.service.clone(),
            dependencies: results.into_iter().collect(),
        }
    }

    /// `true` iff the overall status is healthy. For readiness checks.
    pub async fn is_healthy(&self) -> bool {
        self.check_health().await.is_healthy()
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Dependency names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl std::fmt::Debug for HealthRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthRegistry")
            .field("service", &self.service)
            .field("version", &self.version)
            .field("policy", &self.policy)
            .field("dependencies", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
