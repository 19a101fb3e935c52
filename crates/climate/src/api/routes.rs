//! Axum route definitions for the climate API.

use crate::api::handlers::{self, ClimateApiState};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Create all climate routes.
///
/// # Routes
///
/// - `GET /` - Route listing
/// - `GET /api/v1.0/precipitation` - Precipitation over the last year
/// - `GET /api/v1.0/stations` - Station identifiers
/// - `GET /api/v1.0/tobs` - Most active station's temperatures over the last year
/// - `GET /api/v1.0/{start}` - Temperature stats from start to the latest date
/// - `GET /api/v1.0/{start}/{end}` - Temperature stats over an inclusive range
pub fn climate_routes(state: Arc<ClimateApiState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/v1.0/precipitation", get(handlers::precipitation))
        .route("/api/v1.0/stations", get(handlers::stations))
        .route("/api/v1.0/tobs", get(handlers::temperature_observations))
        .route("/api/v1.0/:start", get(handlers::temperature_stats_from))
        .route("/api/v1.0/:start/:end", get(handlers::temperature_stats_range))
        .with_state(state)
}
