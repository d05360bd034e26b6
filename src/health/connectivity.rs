//! Connectivity probes.
//!
//! Wraps a [`ConnectivityTest`] supplied by the owning service (usually a
//! trivial database query) and maps its outcome onto a [`ProbeResult`]:
//!
//! ```text
//! Ok(true)  → healthy
//! Ok(false) → unhealthy, "Database connection failed"
//! Err(e)    → unhealthy, e.to_string()
//! ```
//!
//! Latency is recorded in every case.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::health::probe::{elapsed_ms, ConnectivityTest, Probe, ProbeError, ProbeResult};

/// Message reported when a connectivity test answers `false`.
pub const CONNECTION_FAILED: &str = "Database connection failed";

/// Probe over a boolean connectivity test.
pub struct ConnectivityProbe<T> {
    test: T,
    refused_message: String,
}

impl<T: ConnectivityTest> ConnectivityProbe<T> {
    pub fn new(test: T) -> Self {
        Self {
            test,
            refused_message: CONNECTION_FAILED.to_string(),
        }
    }

    /// Override the message reported when the test answers `false`.
    pub fn with_refused_message(mut self, message: impl Into<String>) -> Self {
        self.refused_message = message.into();
        self
    }
}

#[async_trait]
impl<T: ConnectivityTest> Probe for ConnectivityProbe<T> {
    async fn probe(&self) -> ProbeResult {
        let start = Instant::now();
        match self.test.test().await {
            Ok(true) => ProbeResult::healthy(elapsed_ms(start)),
            Ok(false) => ProbeResult::unhealthy(Some(elapsed_ms(start)), self.refused_message.clone()),
            Err(e) => ProbeResult::unhealthy(Some(elapsed_ms(start)), e.to_string()),
        }
    }
}

/// Connectivity test backed by an async closure.
///
/// ```ignore
/// let probe = ConnectivityProbe::new(FnConnectivity::new(|| async { Ok(true) }));
/// ```
pub struct FnConnectivity<F>(F);

impl<F, Fut> FnConnectivity<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, ProbeError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> ConnectivityTest for FnConnectivity<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, ProbeError>> + Send + 'static,
{
    async fn test(&self) -> Result<bool, ProbeError> {
        (self.0)().await
    }
}

/// PostgreSQL connectivity: runs `SELECT 1` on a lazily connected pool.
#[derive(Clone)]
pub struct PgConnectivity {
    pool: PgPool,
}

impl PgConnectivity {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a small pool that only connects on the first check.
    ///
    /// The acquire timeout bounds how long a single check may block.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy_with(options);

        tracing::debug!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Database probe pool created"
        );

        Self::new(pool)
    }
}

#[async_trait]
impl ConnectivityTest for PgConnectivity {
    async fn test(&self) -> Result<bool, ProbeError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(true)
    }
}
