//! API handlers for climate HTTP endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::api::models::*;
use crate::error::ClimateError;
use crate::service::ClimateService;

/// Shared state for climate API handlers.
pub struct ClimateApiState {
    pub service: Arc<ClimateService>,
}

impl ClimateApiState {
    pub fn new(service: ClimateService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// Map a service error onto a status code and JSON error body
pub fn error_response(err: ClimateError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ClimateError::InvalidDate(detail) => {
            debug!(%detail, "Rejected date parameter");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(INVALID_DATE_MESSAGE)),
            )
        }
        ClimateError::EmptyDataset => {
            warn!("Request needs a reference date but the dataset is empty");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(EMPTY_DATASET_MESSAGE)),
            )
        }
        other => {
            error!(error = %other, "Climate query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(other.to_string())),
            )
        }
    }
}

/// GET /
///
/// Lists the available routes, using the dataset's reference window for the
/// example statistics paths.
pub async fn index(State(state): State<Arc<ClimateApiState>>) -> ApiResult<Html<String>> {
    let (start, end) = match state.service.reference_window().await {
        Ok(window) => (window.one_year_prior, window.most_recent),
        Err(ClimateError::EmptyDataset) => ("&lt;start&gt;".to_string(), "&lt;end&gt;".to_string()),
        Err(e) => return Err(error_response(e)),
    };

    Ok(Html(format!(
        "Welcome to the Climate App API!<br/>\
         Available Routes:<br/>\
         /api/v1.0/precipitation<br/>\
         /api/v1.0/stations<br/>\
         /api/v1.0/tobs<br/>\
         /api/v1.0/{start}<br/>\
         /api/v1.0/{start}/{end}<br/>"
    )))
}

/// GET /api/v1.0/precipitation
pub async fn precipitation(
    State(state): State<Arc<ClimateApiState>>,
) -> ApiResult<Json<PrecipitationResponse>> {
    state
        .service
        .precipitation()
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/v1.0/stations
pub async fn stations(State(state): State<Arc<ClimateApiState>>) -> ApiResult<Json<StationsResponse>> {
    state
        .service
        .stations()
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/v1.0/tobs
pub async fn temperature_observations(
    State(state): State<Arc<ClimateApiState>>,
) -> ApiResult<Json<TemperatureObservationsResponse>> {
    state
        .service
        .temperature_observations()
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/v1.0/{start}
pub async fn temperature_stats_from(
    State(state): State<Arc<ClimateApiState>>,
    Path(start): Path<String>,
) -> ApiResult<Json<TemperatureStatsResponse>> {
    state
        .service
        .temperature_stats(&start, None)
        .await
        .map(|stats| Json(stats.as_array()))
        .map_err(error_response)
}

/// GET /api/v1.0/{start}/{end}
pub async fn temperature_stats_range(
    State(state): State<Arc<ClimateApiState>>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<Json<TemperatureStatsResponse>> {
    state
        .service
        .temperature_stats(&start, Some(&end))
        .await
        .map(|stats| Json(stats.as_array()))
        .map_err(error_response)
}
