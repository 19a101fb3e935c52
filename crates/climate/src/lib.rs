//! Climate observation service
//!
//! Read-only queries over a dataset of weather stations and their daily
//! measurements (precipitation and temperature), plus the HTTP API that
//! exposes them.
//!
//! # Features
//!
//! - Reference window resolution (most recent date, one year prior)
//! - Precipitation for the last twelve months
//! - Station listing
//! - Temperature observations of the most active station
//! - Min/avg/max temperature statistics over a date range
//!
//! # Feature Flags
//!
//! - `sqlite` - Enable the SQLite-backed store
//! - `api` - Enable HTTP API

pub mod dates;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

// Re-export commonly used types
pub use dates::{parse_date, ReferenceWindow, DATE_FORMAT};
pub use error::{ClimateError, Result};
pub use service::ClimateService;
pub use types::{Measurement, Station, StationActivity, TemperatureObservation, TemperatureStats};

// Store exports
pub use store::memory::InMemoryClimateStore;
pub use store::traits::{ClimateStore, StoreSession};

#[cfg(feature = "sqlite")]
pub use store::sqlite::SqliteClimateStore;
