//! SQLite implementation of the `ClimateStore` trait.
//!
//! The dataset is opened read-only. Each session owns one pooled connection,
//! which goes back to the pool when the session is dropped.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::error::ClimateError;
use crate::store::traits::{ClimateStore, StoreResult, StoreSession};
use crate::types::{StationActivity, TemperatureObservation, TemperatureStats};

/// SQLite-backed climate store.
///
/// Expects the two tables `station` and `measurement` described in
/// `migrations/001_create_climate_tables.sql`.
#[derive(Debug, Clone)]
pub struct SqliteClimateStore {
    pool: SqlitePool,
}

impl SqliteClimateStore {
    /// Open the dataset file read-only with a bounded connection pool.
    pub async fn open(
        path: impl AsRef<Path>,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, ClimateError> {
        let path = path.as_ref();

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| {
                ClimateError::StorageError(format!(
                    "Failed to open database {}: {}",
                    path.display(),
                    e
                ))
            })?;

        info!(path = %path.display(), max_connections, "Opened SQLite climate dataset");

        Ok(Self { pool })
    }

    /// Create from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check that both tables expose the columns the queries rely on.
    #[instrument(skip(self))]
    pub async fn verify_schema(&self) -> Result<(), ClimateError> {
        let checks = [
            ("station", "SELECT station, name, latitude, longitude, elevation FROM station LIMIT 0"),
            ("measurement", "SELECT station, date, prcp, tobs FROM measurement LIMIT 0"),
        ];

        for (table, sql) in checks {
            sqlx::query(sql).fetch_all(&self.pool).await.map_err(|e| {
                ClimateError::ConfigError(format!("Table '{}' does not match the expected schema: {}", table, e))
            })?;
            debug!(table, "Schema check passed");
        }

        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ClimateStore for SqliteClimateStore {
    async fn session(&self) -> StoreResult<Box<dyn StoreSession>> {
        let conn = self.pool.acquire().await.map_err(|e| {
            ClimateError::StorageError(format!("Failed to acquire connection: {}", e))
        })?;

        Ok(Box::new(SqliteSession { conn }))
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// One request's connection
struct SqliteSession {
    conn: PoolConnection<Sqlite>,
}

#[async_trait]
impl StoreSession for SqliteSession {
    async fn latest_date(&mut self) -> StoreResult<Option<String>> {
        let latest = sqlx::query_scalar::<_, Option<String>>("SELECT MAX(date) FROM measurement")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(latest)
    }

    async fn precipitation_since(&mut self, since: &str) -> StoreResult<Vec<(String, Option<f64>)>> {
        let rows = sqlx::query_as::<_, (String, Option<f64>)>(
            "SELECT date, prcp FROM measurement WHERE date >= ?1 ORDER BY date, id",
        )
        .bind(since)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    async fn station_ids(&mut self) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>("SELECT station FROM station ORDER BY id")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(ids)
    }

    async fn most_active_station(&mut self) -> StoreResult<Option<StationActivity>> {
        let row = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT station, COUNT(station) AS observations
            FROM measurement
            GROUP BY station
            ORDER BY observations DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(|(station, observations)| StationActivity {
            station,
            observations,
        }))
    }

    async fn station_temperatures_since(
        &mut self,
        station: &str,
        since: &str,
    ) -> StoreResult<Vec<TemperatureObservation>> {
        let rows = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT date, tobs FROM measurement WHERE station = ?1 AND date >= ?2 ORDER BY date, id",
        )
        .bind(station)
        .bind(since)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    async fn temperature_stats(&mut self, start: &str, end: &str) -> StoreResult<TemperatureStats> {
        let (min, avg, max) = sqlx::query_as::<_, (Option<f64>, Option<f64>, Option<f64>)>(
            "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= ?1 AND date <= ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(TemperatureStats { min, avg, max })
    }
}
