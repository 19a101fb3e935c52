//! HTTP server implementation using Axum
//!
//! Wraps an Axum router with request tracing and request metrics, and
//! implements the [`Server`](crate::Server) trait for lifecycle management.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use observability::ServerMetrics;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::traits::Server;

/// HTTP server implementation using Axum
///
/// # Example
///
/// ```ignore
/// use server::{HttpServer, ServerConfig, ServerExt};
///
/// let server = HttpServer::new(ServerConfig::new("127.0.0.1", 5000), router);
/// server.run_with_ctrl_c().await?;
/// ```
#[derive(Clone)]
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    running: Arc<AtomicBool>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    /// Create a server for `router`, adding tracing and request metrics
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router: instrument_router(router, ServerMetrics::new("http")),
            running: Arc::new(AtomicBool::new(false)),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the instrumented router (for testing or inspection)
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Wrap every route in a trace span and record its outcome
pub fn instrument_router(router: Router, metrics: ServerMetrics) -> Router {
    router
        .layer(middleware::from_fn_with_state(metrics, record_request_metrics))
        .layer(TraceLayer::new_for_http())
}

async fn record_request_metrics(
    State(metrics): State<ServerMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    metrics.record_request(start.elapsed(), response.status().as_u16());
    response
}

#[async_trait]
impl Server for HttpServer {
    fn name(&self) -> &str {
        "http"
    }

    fn address(&self) -> Option<SocketAddr> {
        *self.bound_addr.read()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self, shutdown_token: CancellationToken) -> Result<()> {
        let addr = self.config.http_addr()?;

        info!(%addr, "Starting HTTP server");

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;

        let local_addr = listener.local_addr().map_err(ServerError::Io)?;
        *self.bound_addr.write() = Some(local_addr);

        info!(%local_addr, "HTTP server listening");

        self.running.store(true, Ordering::SeqCst);

        let result = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
                info!("HTTP server received shutdown signal");
            })
            .await;

        self.running.store(false, Ordering::SeqCst);
        *self.bound_addr.write() = None;

        match result {
            Ok(()) => {
                info!("HTTP server shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(%e, "HTTP server error");
                Err(ServerError::Io(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ServerExt;
    use axum::body::Body;
    use axum::http::{self, StatusCode};
    use axum::routing::get;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new().route("/", get(|| async { "climate" }))
    }

    #[tokio::test]
    async fn test_http_server_binds_and_shuts_down() {
        let server = HttpServer::new(ServerConfig::ephemeral(), test_router());
        let watcher = server.clone();
        let (handle, token) = server.spawn();

        // Give server time to start
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(watcher.is_running());
        assert!(watcher.address().is_some());

        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.is_ok(), "Server should shutdown within timeout");
        assert!(!watcher.is_running());
        assert!(watcher.address().is_none());
    }

    #[tokio::test]
    async fn test_instrumented_router_passes_responses_through() {
        let router = instrument_router(test_router(), ServerMetrics::new("test"));

        let ok = router
            .clone()
            .oneshot(http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let missing = router
            .oneshot(http::Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_http_server_name() {
        let server = HttpServer::new(ServerConfig::default(), test_router());
        assert_eq!(server.name(), "http");
    }
}
