//! Port validation utilities
//!
//! Checking a port before binding is racy: another process can take it in
//! between. These checks give early feedback; the real bind is authoritative.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Check that the configured HTTP port can be bound
pub async fn validate_ports_available(config: &ServerConfig) -> Result<()> {
    info!("Validating server ports...");

    if config.http_port == 0 {
        debug!("Ephemeral HTTP port requested, nothing to check");
        return Ok(());
    }

    validate_single_port(&config.host, config.http_port, "HTTP").await?;

    info!("Server ports validated successfully");
    Ok(())
}

async fn validate_single_port(host: &str, port: u16, protocol: &str) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    debug!("Checking {} port {}", protocol, port);

    match TcpListener::bind(&addr).await {
        Ok(listener) => {
            let local_addr = listener
                .local_addr()
                .map_err(|e| ServerError::bind(addr.clone(), e))?;

            // Release the port for the real bind
            drop(listener);

            info!("{} port {} is available ({})", protocol, port, local_addr);
            Ok(())
        }
        Err(e) => {
            error!("{} port {} is NOT available: {}", protocol, port, e);
            Err(ServerError::port_in_use(port, e.to_string()))
        }
    }
}

/// Returns `true` if the port appears to be in use
pub async fn is_port_in_use(host: &str, port: u16) -> bool {
    let addr = format!("{}:{}", host, port);
    TcpListener::bind(&addr).await.is_err()
}

/// Reject port 0 for explicit binding and warn on privileged ports
pub fn validate_port_range(port: u16) -> Result<()> {
    if port == 0 {
        Err(ServerError::ConfigError(
            "Port cannot be 0 (ephemeral port assignment not supported for explicit binding)"
                .to_string(),
        ))
    } else {
        if port < 1024 {
            warn!(
                "Port {} is a privileged port (requires root/admin privileges)",
                port
            );
        }
        Ok(())
    }
}
