//! Observability for the climate API
//!
//! - Structured logging via tracing
//! - Prometheus metrics for served requests
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("climate-api", LogFormat::Pretty)?;
//!
//! // Optional
//! observability::metrics::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, ServerMetrics};
