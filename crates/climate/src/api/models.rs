//! Request/response models for climate HTTP endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::TemperatureObservation;

/// Message returned for any unparseable date path segment
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Please use YYYY-MM-DD";

/// Message returned when a reference date is needed but no measurement exists
pub const EMPTY_DATASET_MESSAGE: &str = "No measurements available";

/// Date → precipitation, keys in ascending date order
pub type PrecipitationResponse = BTreeMap<String, Option<f64>>;

/// Station identifiers in storage order
pub type StationsResponse = Vec<String>;

/// Temperature observations of the most active station
pub type TemperatureObservationsResponse = Vec<TemperatureObservation>;

/// `[min, avg, max]`, each `null` when no row qualified
pub type TemperatureStatsResponse = [Option<f64>; 3];

/// Error body shared by every route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
