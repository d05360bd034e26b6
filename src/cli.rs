//! Standalone health check across every service of a deployment.
//!
//! Polls each service's `/health` endpoint and the database concurrently,
//! then prints one line per check:
//!
//! ```text
//! 🔍 Health Check
//! ================================
//! ✅ PostgreSQL Database (4ms)
//! ✅ API Gateway (2ms)
//! ❌ User Service (1ms) - HTTP 503
//! ================================
//! 🕐 Total check time: 6ms
//! ⚠️  Some services are unhealthy
//! ```

use std::time::Duration;

use url::Url;

use crate::config::{CliConfig, PeerConfig, ServiceConfig};
use crate::health::aggregator::{settle_all, NamedProbe};
use crate::health::{ConnectivityProbe, PeerServiceProbe, PgConnectivity, ProbeResult};

/// Label of the database check.
pub const DATABASE_CHECK: &str = "PostgreSQL Database";

const RULE: &str = "================================";

/// Gateway, user and post services on localhost, ports taken from
/// `API_GATEWAY_PORT`, `USER_SERVICE_PORT` and `POST_SERVICE_PORT`.
pub fn default_services<F>(lookup: F, timeout_secs: u64) -> Vec<PeerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    [
        ("API Gateway", "API_GATEWAY_PORT", "3000"),
        ("User Service", "USER_SERVICE_PORT", "3001"),
        ("Post Service", "POST_SERVICE_PORT", "3002"),
    ]
    .into_iter()
    .map(|(name, key, default_port)| {
        let port = lookup(key).unwrap_or_else(|| default_port.to_string());
        PeerConfig {
            name: name.to_string(),
            url: format!("http://localhost:{port}/health"),
            timeout_secs,
        }
    })
    .collect()
}

/// Parse a `NAME=URL` command-line service spec.
pub fn parse_service_arg(raw: &str) -> Result<PeerConfig, String> {
    let (name, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=URL, got '{raw}'"))?;
    let (name, url) = (name.trim(), url.trim());

    if name.is_empty() {
        return Err(format!("missing service name in '{raw}'"));
    }
    Url::parse(url).map_err(|e| format!("invalid URL '{url}': {e}"))?;

    Ok(PeerConfig {
        name: name.to_string(),
        url: url.to_string(),
        timeout_secs: 5,
    })
}

/// Services to check: command line, else `[cli] services`, else the defaults.
///
/// Command-line and default services use `config.timeout_secs`. Configured
/// services keep their own timeout unless `timeout_override` is set.
pub fn select_services<F>(
    requested: Vec<PeerConfig>,
    config: &CliConfig,
    timeout_override: Option<u64>,
    lookup: F,
) -> Vec<PeerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let timeout_secs = config.timeout_secs;

    if !requested.is_empty() {
        requested
            .into_iter()
            .map(|service| PeerConfig { timeout_secs, ..service })
            .collect()
    } else if !config.services.is_empty() {
        config
            .services
            .iter()
            .map(|service| PeerConfig {
                timeout_secs: timeout_override.unwrap_or(service.timeout_secs),
                ..service.clone()
            })
            .collect()
    } else {
        default_services(lookup, timeout_secs)
    }
}

/// Build the checks to run: database first (when enabled), then services.
pub fn build_checks(
    config: &ServiceConfig,
    services: &[PeerConfig],
    client: &reqwest::Client,
) -> Result<Vec<NamedProbe>, url::ParseError> {
    let mut checks: Vec<NamedProbe> = Vec::with_capacity(services.len() + 1);

    if config.cli.check_database {
        let mut database = config.database.clone();
        database.connect_timeout_secs = config.cli.timeout_secs;
        checks.push((
            DATABASE_CHECK.to_string(),
            Box::new(ConnectivityProbe::new(PgConnectivity::connect_lazy(&database))),
        ));
    }

    for service in services {
        let url = Url::parse(&service.url)?;
        let timeout = Duration::from_secs(service.timeout_secs);
        checks.push((
            service.name.clone(),
            Box::new(PeerServiceProbe::with_client(client.clone(), url, timeout)),
        ));
    }

    Ok(checks)
}

/// Run every check concurrently. Results keep the order of `checks`.
pub async fn run_checks(checks: &[NamedProbe]) -> Vec<(String, ProbeResult)> {
    settle_all(checks).await
}

/// `✅ name (12ms) - error`
pub fn format_line(name: &str, result: &ProbeResult) -> String {
    let icon = if result.is_healthy() { "✅" } else { "❌" };
    let mut line = format!("{icon} {name}");
    if let Some(ms) = result.response_time {
        line.push_str(&format!(" ({ms}ms)"));
    }
    if let Some(error) = &result.error {
        line.push_str(&format!(" - {error}"));
    }
    line
}

pub fn all_healthy(outcomes: &[(String, ProbeResult)]) -> bool {
    outcomes.iter().all(|(_, result)| result.is_healthy())
}

/// Full console report.
pub fn render(outcomes: &[(String, ProbeResult)], total: Duration) -> String {
    let mut lines = vec!["🔍 Health Check".to_string(), RULE.to_string()];
    lines.extend(outcomes.iter().map(|(name, result)| format_line(name, result)));
    lines.push(RULE.to_string());
    lines.push(format!("🕐 Total check time: {}ms", total.as_millis()));
    lines.push(if all_healthy(outcomes) {
        "🎉 All services are healthy!".to_string()
    } else {
        "⚠️  Some services are unhealthy".to_string()
    });
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_healthy_line() {
        assert_eq!(format_line("API Gateway", &ProbeResult::healthy(12)), "✅ API Gateway (12ms)");
    }

    #[test]
    fn test_format_unhealthy_line() {
        let result = ProbeResult::unhealthy(Some(3), "HTTP 503");
        assert_eq!(format_line("User Service", &result), "❌ User Service (3ms) - HTTP 503");

        let result = ProbeResult::unhealthy(None, "Request timeout");
        assert_eq!(format_line("Post Service", &result), "❌ Post Service - Request timeout");
    }

    #[test]
    fn test_default_services_use_port_overrides() {
        let services = default_services(
            |key| (key == "USER_SERVICE_PORT").then(|| "4001".to_string()),
            5,
        );

        let urls: Vec<&str> = services.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:3000/health",
                "http://localhost:4001/health",
                "http://localhost:3002/health",
            ]
        );
    }

    fn configured(timeout_secs: u64) -> CliConfig {
        CliConfig {
            services: vec![PeerConfig {
                name: "Search".into(),
                url: "http://localhost:3005/health".into(),
                timeout_secs,
            }],
            timeout_secs: 1,
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_timeout_override_reaches_configured_services() {
        let services = select_services(Vec::new(), &configured(5), Some(1), |_| None);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "Search");
        assert_eq!(services[0].timeout_secs, 1);

        let services = select_services(Vec::new(), &configured(5), None, |_| None);
        assert_eq!(services[0].timeout_secs, 5);
    }

    #[test]
    fn test_requested_services_win() {
        let requested = vec![parse_service_arg("Auth=http://localhost:3009/health").unwrap()];
        let services = select_services(requested, &configured(5), None, |_| None);

        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "Auth");
        assert_eq!(services[0].timeout_secs, 1);

        let services = select_services(Vec::new(), &CliConfig::default(), None, |_| None);
        assert_eq!(services.len(), 3);
        assert!(services.iter().all(|s| s.timeout_secs == 5));
    }

    #[test]
    fn test_parse_service_arg() {
        let service = parse_service_arg("Search=http://localhost:3005/health").unwrap();
        assert_eq!(service.name, "Search");
        assert_eq!(service.url, "http://localhost:3005/health");

        assert!(parse_service_arg("no-equals").is_err());
        assert!(parse_service_arg("=http://localhost/health").is_err());
        assert!(parse_service_arg("Search=not a url").is_err());
    }

    #[test]
    fn test_render_verdict() {
        let healthy = vec![("API Gateway".to_string(), ProbeResult::healthy(2))];
        let report = render(&healthy, Duration::from_millis(7));
        assert!(report.contains("🕐 Total check time: 7ms"));
        assert!(report.ends_with("🎉 All services are healthy!"));

        let mixed = vec![
            ("API Gateway".to_string(), ProbeResult::healthy(2)),
            ("User Service".to_string(), ProbeResult::unhealthy(Some(1), "HTTP 500")),
        ];
        assert!(!all_healthy(&mixed));
        assert!(render(&mixed, Duration::from_millis(7)).ends_with("⚠️  Some services are unhealthy"));
    }

    #[tokio::test]
    async fn test_build_checks_orders_database_first() {
        let config = ServiceConfig::default();
        let services = default_services(|_| None, 1);
        let checks = build_checks(&config, &services, &reqwest::Client::new()).unwrap();

        let names: Vec<&str> = checks.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec![DATABASE_CHECK, "API Gateway", "User Service", "Post Service"]);
    }
}
