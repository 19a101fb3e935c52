//! In-memory climate store, used for tests and fixtures

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::ClimateError;
use crate::store::traits::{ClimateStore, StoreResult, StoreSession};
use crate::types::{Measurement, Station, StationActivity, TemperatureObservation, TemperatureStats};

#[derive(Debug, Default)]
struct Dataset {
    stations: Vec<Station>,
    measurements: Vec<Measurement>,
}

/// In-memory climate store
///
/// Rows keep their insertion order, which stands in for storage order.
/// The store counts open sessions so tests can check that every request
/// released its session.
#[derive(Clone, Default)]
pub struct InMemoryClimateStore {
    data: Arc<Dataset>,
    open_sessions: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryClimateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over the given rows
    pub fn with_data(stations: Vec<Station>, measurements: Vec<Measurement>) -> Self {
        Self {
            data: Arc::new(Dataset {
                stations,
                measurements,
            }),
            ..Self::default()
        }
    }

    /// Make every new session fail as if the backing database were gone
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Sessions currently held by callers
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClimateStore for InMemoryClimateStore {
    async fn session(&self) -> StoreResult<Box<dyn StoreSession>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClimateError::StorageError(
                "in-memory store marked unavailable".to_string(),
            ));
        }

        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemorySession {
            data: Arc::clone(&self.data),
            open_sessions: Arc::clone(&self.open_sessions),
        }))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

struct InMemorySession {
    data: Arc<Dataset>,
    open_sessions: Arc<AtomicUsize>,
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

impl InMemorySession {
    /// Measurements with `date >= since`, stable-sorted by date
    fn sorted_since(&self, since: &str) -> Vec<&Measurement> {
        let mut rows: Vec<&Measurement> = self
            .data
            .measurements
            .iter()
            .filter(|m| m.date.as_str() >= since)
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        rows
    }
}

#[async_trait]
impl StoreSession for InMemorySession {
    async fn latest_date(&mut self) -> StoreResult<Option<String>> {
        Ok(self.data.measurements.iter().map(|m| m.date.clone()).max())
    }

    async fn precipitation_since(&mut self, since: &str) -> StoreResult<Vec<(String, Option<f64>)>> {
        Ok(self
            .sorted_since(since)
            .into_iter()
            .map(|m| (m.date.clone(), m.prcp))
            .collect())
    }

    async fn station_ids(&mut self) -> StoreResult<Vec<String>> {
        Ok(self.data.stations.iter().map(|s| s.station.clone()).collect())
    }

    async fn most_active_station(&mut self) -> StoreResult<Option<StationActivity>> {
        // Count per station, remembering first-seen order for ties
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, i64> = HashMap::new();

        for m in &self.data.measurements {
            let count = counts.entry(m.station.as_str()).or_insert_with(|| {
                order.push(m.station.as_str());
                0
            });
            *count += 1;
        }

        let mut ranked: Vec<StationActivity> = order
            .into_iter()
            .map(|station| StationActivity {
                station: station.to_string(),
                observations: counts.get(station).copied().unwrap_or(0),
            })
            .collect();
        ranked.sort_by(|a, b| b.observations.cmp(&a.observations));

        Ok(ranked.into_iter().next())
    }

    async fn station_temperatures_since(
        &mut self,
        station: &str,
        since: &str,
    ) -> StoreResult<Vec<TemperatureObservation>> {
        Ok(self
            .sorted_since(since)
            .into_iter()
            .filter(|m| m.station == station)
            .map(|m| TemperatureObservation {
                date: m.date.clone(),
                tobs: m.tobs,
            })
            .collect())
    }

    async fn temperature_stats(&mut self, start: &str, end: &str) -> StoreResult<TemperatureStats> {
        Ok(TemperatureStats::from_temperatures(
            self.data
                .measurements
                .iter()
                .filter(|m| m.date.as_str() >= start && m.date.as_str() <= end)
                .map(|m| m.tobs),
        ))
    }
}
