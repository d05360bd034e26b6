//! Health report returned by `GET /health`.
//!
//! Wire shape:
//! ```text
//! { "status": "healthy" | "degraded" | "unhealthy",
//!   "timestamp": "2024-05-01T12:00:00.000Z",
//!   "uptime": 12.5,
//!   "version": "1.0.0",
//!   "service": "user-service",
//!   "dependencies": { "<name>": { "status", "responseTime"?, "error"? } } }
//! ```
//! `dependencies` is omitted when nothing was checked.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::probe::ProbeResult;

/// Overall status of a service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Healthy => "healthy",
            OverallStatus::Degraded => "degraded",
            OverallStatus::Unhealthy => "unhealthy",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite status of one service instance at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: OverallStatus,

    #[serde(with = "iso8601_millis")]
    pub timestamp: DateTime<Utc>,

    /// Seconds since the service started.
    pub uptime: f64,

    pub version: String,

    pub service: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, ProbeResult>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == OverallStatus::Healthy
    }

    pub fn dependency(&self, name: &str) -> Option<&ProbeResult> {
        self.dependencies.get(name)
    }
}

/// `Date.toISOString()` layout: UTC, millisecond precision, `Z` suffix.
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
