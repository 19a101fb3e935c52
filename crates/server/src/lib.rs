//! HTTP server infrastructure for the climate API
//!
//! # Architecture
//!
//! [`HttpServer`] implements the [`Server`] trait, which gives a consistent
//! interface for running and monitoring a server. [`ServerExt`] adds
//! `spawn()` and `run_with_ctrl_c()`.
//!
//! Shutdown coordination uses `CancellationToken` from `tokio_util`:
//! cancelling a parent token cancels every child token.
//!
//! # Quick Start
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::new("0.0.0.0", 5000);
//!     let server = HttpServer::new(config, climate_router);
//!     server.run_with_ctrl_c().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Bind address configuration
//! - [`traits`] - `Server` and `ServerExt` traits
//! - [`http`] - HTTP server using Axum
//! - [`health`] - Health check endpoint
//! - [`port_validator`] - Pre-bind port checks
//! - [`shutdown`] - Graceful shutdown utilities

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use config::{ServerConfig, DEFAULT_HTTP_PORT};
pub use error::{Result, ServerError};
pub use health::{health_routes, HealthState, HealthStatus};
pub use http::HttpServer;
pub use port_validator::validate_ports_available;
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
