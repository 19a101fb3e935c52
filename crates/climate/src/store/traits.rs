//! ClimateStore and StoreSession trait definitions

use async_trait::async_trait;

use crate::error::ClimateError;
use crate::types::{StationActivity, TemperatureObservation, TemperatureStats};

/// ClimateStore trait - hands out per-request sessions over the dataset
///
/// Implementations are shared across all requests. Every request opens exactly
/// one session, runs its queries through it and drops it; dropping releases
/// whatever the session holds (a pooled connection for SQLite).
#[async_trait]
pub trait ClimateStore: Send + Sync {
    /// Open a read session for the duration of one request
    async fn session(&self) -> StoreResult<Box<dyn StoreSession>>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

/// StoreSession trait - the read queries a request can run
///
/// All dates passed in are canonical `YYYY-MM-DD` strings.
#[async_trait]
pub trait StoreSession: Send {
    /// Maximum measurement date, `None` for an empty dataset
    async fn latest_date(&mut self) -> StoreResult<Option<String>>;

    /// `(date, prcp)` for every measurement on or after `since`
    ///
    /// # Returns
    /// Rows in ascending date order
    async fn precipitation_since(&mut self, since: &str) -> StoreResult<Vec<(String, Option<f64>)>>;

    /// Station identifiers in storage order, duplicates included
    async fn station_ids(&mut self) -> StoreResult<Vec<String>>;

    /// Station with the most measurement rows, `None` for an empty dataset
    async fn most_active_station(&mut self) -> StoreResult<Option<StationActivity>>;

    /// Temperature readings of one station on or after `since`
    ///
    /// # Returns
    /// Rows in ascending date order
    async fn station_temperatures_since(
        &mut self,
        station: &str,
        since: &str,
    ) -> StoreResult<Vec<TemperatureObservation>>;

    /// Min/avg/max temperature over `start..=end`
    async fn temperature_stats(&mut self, start: &str, end: &str) -> StoreResult<TemperatureStats>;
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, ClimateError>;
