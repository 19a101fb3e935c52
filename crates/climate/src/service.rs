//! Climate Service - the query layer behind every route
//!
//! Each public operation opens one store session, runs its queries through
//! it and lets it drop before returning, so no session outlives a request
//! whatever the outcome.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::dates::{normalize_date, ReferenceWindow};
use crate::error::{ClimateError, Result};
use crate::store::traits::{ClimateStore, StoreSession};
use crate::types::{TemperatureObservation, TemperatureStats};

/// Climate Service
pub struct ClimateService {
    store: Arc<dyn ClimateStore>,
}

impl ClimateService {
    /// Create a new service over a store
    pub fn new(store: Arc<dyn ClimateStore>) -> Self {
        Self { store }
    }

    /// Get the underlying store
    pub fn store(&self) -> &Arc<dyn ClimateStore> {
        &self.store
    }

    /// Most recent observation date and the same day one year earlier
    #[instrument(skip(self))]
    pub async fn reference_window(&self) -> Result<ReferenceWindow> {
        let mut session = self.store.session().await?;
        resolve_window(session.as_mut()).await
    }

    /// Precipitation by date over the reference window.
    ///
    /// Rows are applied in ascending date order; when several stations report
    /// on the same date the last row wins.
    #[instrument(skip(self))]
    pub async fn precipitation(&self) -> Result<BTreeMap<String, Option<f64>>> {
        let mut session = self.store.session().await?;
        let window = resolve_window(session.as_mut()).await?;

        let rows = session.precipitation_since(&window.one_year_prior).await?;
        debug!(rows = rows.len(), since = %window.one_year_prior, "Loaded precipitation rows");

        let mut by_date = BTreeMap::new();
        for (date, prcp) in rows {
            by_date.insert(date, prcp);
        }

        Ok(by_date)
    }

    /// Distinct station identifiers, each at its first storage position
    #[instrument(skip(self))]
    pub async fn stations(&self) -> Result<Vec<String>> {
        let mut session = self.store.session().await?;
        let rows = session.station_ids().await?;

        let mut seen = HashSet::with_capacity(rows.len());
        let ids: Vec<String> = rows.into_iter().filter(|id| seen.insert(id.clone())).collect();
        debug!(stations = ids.len(), "Loaded station identifiers");

        Ok(ids)
    }

    /// Temperature observations of the most active station over the
    /// reference window, oldest first
    #[instrument(skip(self))]
    pub async fn temperature_observations(&self) -> Result<Vec<TemperatureObservation>> {
        let mut session = self.store.session().await?;
        let window = resolve_window(session.as_mut()).await?;

        let active = session
            .most_active_station()
            .await?
            .ok_or(ClimateError::EmptyDataset)?;
        debug!(station = %active.station, observations = active.observations, "Most active station");

        session
            .station_temperatures_since(&active.station, &window.one_year_prior)
            .await
    }

    /// Min/avg/max temperature from `start` through `end` inclusive.
    ///
    /// Both dates are validated before the store is touched. Without `end`,
    /// the most recent observation date is used.
    #[instrument(skip(self))]
    pub async fn temperature_stats(&self, start: &str, end: Option<&str>) -> Result<TemperatureStats> {
        let start = normalize_date(start)?;
        let end = end.map(normalize_date).transpose()?;

        let mut session = self.store.session().await?;
        let end = match end {
            Some(end) => end,
            None => resolve_window(session.as_mut()).await?.most_recent,
        };

        let stats = session.temperature_stats(&start, &end).await?;
        debug!(%start, %end, empty = stats.is_empty(), "Computed temperature statistics");

        Ok(stats)
    }
}

async fn resolve_window(session: &mut dyn StoreSession) -> Result<ReferenceWindow> {
    let latest = session.latest_date().await?.ok_or(ClimateError::EmptyDataset)?;
    ReferenceWindow::from_most_recent(&latest)
}
