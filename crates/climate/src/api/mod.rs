//! HTTP API for climate queries.
//!
//! ## Modules
//!
//! - `handlers` - Axum handlers, one per route
//! - `routes` - Router wiring
//! - `models` - Response types and error body

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::ClimateApiState;
pub use routes::climate_routes;
