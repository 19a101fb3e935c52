//! Prometheus metrics
//!
//! The exporter is optional; without it every `metrics` macro call is a
//! no-op, so request recording stays unconditional.

use metrics::{counter, histogram, Counter, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus recorder and serve `/metrics` on `port`
///
/// ```ignore
/// observability::metrics::init_metrics(9090)?;
/// // curl http://localhost:9090/metrics
/// ```
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Request metrics for one server
///
/// # Metrics
///
/// * `server_requests_total` - requests served
/// * `server_requests_by_status` - requests served, labelled by status code
/// * `server_request_duration_seconds` - request latency histogram
#[derive(Clone)]
pub struct ServerMetrics {
    requests_total: Counter,
    request_duration: Histogram,
    server_name: String,
}

impl ServerMetrics {
    /// Create metrics labelled with `server_name`
    pub fn new(server_name: &str) -> Self {
        let name = server_name.to_string();

        Self {
            requests_total: counter!("server_requests_total", "server" => name.clone()),
            request_duration: histogram!("server_request_duration_seconds", "server" => name.clone()),
            server_name: name,
        }
    }

    /// Record one completed request
    pub fn record_request(&self, duration: Duration, status_code: u16) {
        self.requests_total.increment(1);
        counter!(
            "server_requests_by_status",
            "server" => self.server_name.clone(),
            "status" => status_code.to_string()
        )
        .increment(1);
        self.request_duration.record(duration.as_secs_f64());
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}
