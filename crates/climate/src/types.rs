//! Core climate data types

use serde::{Deserialize, Serialize};

/// A weather-reporting location.
///
/// Only `station` takes part in queries; the remaining columns are descriptive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct Station {
    pub station: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

impl Station {
    /// Create a station with only its identifier set
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            name: None,
            latitude: None,
            longitude: None,
            elevation: None,
        }
    }

    /// Set the human-readable station name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set coordinates and elevation
    pub fn with_location(mut self, latitude: f64, longitude: f64, elevation: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.elevation = Some(elevation);
        self
    }
}

/// One daily observation at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct Measurement {
    pub station: String,
    /// Observation date, `YYYY-MM-DD`
    pub date: String,
    /// Precipitation, missing on some days
    pub prcp: Option<f64>,
    /// Temperature observation
    pub tobs: f64,
}

impl Measurement {
    pub fn new(
        station: impl Into<String>,
        date: impl Into<String>,
        prcp: Option<f64>,
        tobs: f64,
    ) -> Self {
        Self {
            station: station.into(),
            date: date.into(),
            prcp,
            tobs,
        }
    }
}

/// A single temperature reading as returned by the tobs endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

/// Station identifier with its measurement row count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationActivity {
    pub station: String,
    pub observations: i64,
}

/// Min/avg/max temperature over a set of measurements.
///
/// All three are `None` when no measurement qualified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    /// Aggregate an iterator of temperatures
    pub fn from_temperatures<I>(temperatures: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for t in temperatures {
            count += 1;
            sum += t;
            min = min.min(t);
            max = max.max(t);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: Some(min),
            avg: Some(sum / count as f64),
            max: Some(max),
        }
    }

    /// True when no measurement qualified
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }

    /// `[min, avg, max]`, the wire shape of the statistics endpoints
    pub fn as_array(&self) -> [Option<f64>; 3] {
        [self.min, self.avg, self.max]
    }
}
