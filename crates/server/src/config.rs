//! Server bind configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Port the climate API listens on unless configured otherwise
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Where the HTTP server binds
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 5000);
/// assert_eq!(config.http_addr().unwrap().port(), 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// HTTP port; 0 binds an ephemeral port
    pub http_port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, http_port: u16) -> Self {
        Self {
            host: host.into(),
            http_port,
        }
    }

    /// Loopback with an ephemeral port, for tests
    pub fn ephemeral() -> Self {
        Self::new("127.0.0.1", 0)
    }

    /// Parse the HTTP socket address
    pub fn http_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.http_port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.http_port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_HTTP_PORT)
    }
}
