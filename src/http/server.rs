//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Bind server to listener with graceful shutdown
//!
//! # Routes
//! - `GET /health`: full report, always 200
//! - `GET /health/live`: process liveness, always 200
//! - `GET /health/ready`: 200 when healthy, 503 otherwise

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::health::{HealthRegistry, HealthReport};
use crate::observability::metrics;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<HealthRegistry>,
}

/// HTTP server exposing a service's health endpoints.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server around an already populated registry.
    pub fn new(config: &ServiceConfig, registry: HealthRegistry) -> Self {
        let state = AppState {
            registry: Arc::new(registry),
        };
        let timeout = Duration::from_secs(config.service.request_timeout_secs);
        Self {
            router: build_router(state, timeout),
        }
    }

    /// Serve until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Full report. Always 200; unhealthiness is carried in the body.
async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.registry.check_health().await)
}

async fn liveness_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "alive" }))
}

async fn readiness_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.registry.is_healthy().await;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({ "ready": ready })))
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::registry::DEFAULT_VERSION;
    use crate::health::{ConnectivityProbe, FnConnectivity, NoopProbe, ProbeError};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(registry: HealthRegistry) -> Router {
        build_router(
            AppState {
                registry: Arc::new(registry),
            },
            Duration::from_secs(5),
        )
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn failing_db() -> ConnectivityProbe<impl crate::health::ConnectivityTest> {
        ConnectivityProbe::new(FnConnectivity::new(|| async { Ok::<_, ProbeError>(false) }))
    }

    #[tokio::test]
    async fn test_health_without_dependencies() {
        let resp = app(HealthRegistry::new("user-service", DEFAULT_VERSION))
            .oneshot(get_request("/health"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(X_REQUEST_ID));

        let body = body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "user-service");
        assert_eq!(body["version"], "1.0.0");
        assert!(body["uptime"].is_f64());
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(body.get("dependencies").is_none());
    }

    #[tokio::test]
    async fn test_degraded_health_is_still_200() {
        let mut registry = HealthRegistry::new("post-service", DEFAULT_VERSION);
        registry.add_dependency("db", failing_db());
        registry.add_dependency("user-service", NoopProbe);

        let resp = app(registry).oneshot(get_request("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["dependencies"]["db"]["status"], "unhealthy");
        assert_eq!(body["dependencies"]["db"]["error"], "Database connection failed");
        assert_eq!(body["dependencies"]["user-service"]["status"], "healthy");
        assert_eq!(body["dependencies"]["user-service"]["responseTime"], 0);
    }

    #[tokio::test]
    async fn test_readiness_follows_is_healthy() {
        let ready = app(HealthRegistry::new("gateway", DEFAULT_VERSION))
            .oneshot(get_request("/health/ready"))
            .await
            .unwrap();
        assert_eq!(ready.status(), StatusCode::OK);
        assert_eq!(body_json(ready).await["ready"], true);

        let mut registry = HealthRegistry::new("gateway", DEFAULT_VERSION);
        registry.add_dependency("db", failing_db());
        let not_ready = app(registry).oneshot(get_request("/health/ready")).await.unwrap();
        assert_eq!(not_ready.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(not_ready).await["ready"], false);
    }

    #[tokio::test]
    async fn test_liveness_ignores_dependencies() {
        let mut registry = HealthRegistry::new("gateway", DEFAULT_VERSION);
        registry.add_dependency("db", failing_db());

        let resp = app(registry).oneshot(get_request("/health/live")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "alive");
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_propagated() {
        let request = Request::builder()
            .uri("/health/live")
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = app(HealthRegistry::new("gateway", DEFAULT_VERSION))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(resp.headers()[X_REQUEST_ID], "abc-123");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let resp = app(HealthRegistry::new("gateway", DEFAULT_VERSION))
            .oneshot(get_request("/users"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
