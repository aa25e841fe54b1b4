//! Persistence: the `weather_data` table and the views the dashboard reads.

pub mod models;
pub mod queries;

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::AppError;
use models::{DailyRange, HistoricalDataset, NormalizedRecord, RecentReading};

/// The pipeline runs one query at a time, so a single connection is enough.
const DB_POOL_MAX_CONNECTIONS: u32 = 1;

/// Rows shown in the 24-hour table.
pub const RECENT_READINGS_LIMIT: i64 = 12;
/// Days covered by the weekly table and the summary statistics.
pub const HISTORY_DAYS: i32 = 7;
/// Window for the rolling average temperature.
pub const AVERAGE_WINDOW_HOURS: i32 = 24;
/// A day counts as warm when its maximum reaches this temperature.
pub const WARM_DAY_THRESHOLD_C: i64 = 25;
/// A day counts as cold when its minimum falls to this temperature.
pub const COLD_DAY_THRESHOLD_C: i64 = 0;

/// Summary statistics over the history window.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub rainy_days: i64,
    pub warm_days: i64,
    pub cold_days: i64,
    pub average_temperature_c: Option<f64>,
}

/// Handle to the observation store. Constructed explicitly by the caller and
/// passed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connect to the database named by `config.database_url`.
    ///
    /// Returns `StoreUnavailable` when no URL is configured.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or(AppError::StoreUnavailable)?;

        let pool = PgPoolOptions::new()
            .max_connections(DB_POOL_MAX_CONNECTIONS)
            .connect(url)
            .await
            .map_err(AppError::StoreFailure)?;

        Ok(Self { pool })
    }

    pub async fn insert_observation(&self, record: &NormalizedRecord) -> Result<Uuid, AppError> {
        queries::insert_observation(&self.pool, record)
            .await
            .map_err(AppError::StoreFailure)
    }

    /// Load the recent readings and the weekly aggregates in one go.
    pub async fn load_history(&self) -> Result<HistoricalDataset, AppError> {
        let recent = queries::get_recent_readings(&self.pool, RECENT_READINGS_LIMIT)
            .await
            .map_err(AppError::QueryFailure)?;
        let weekly = queries::get_daily_ranges(&self.pool, HISTORY_DAYS)
            .await
            .map_err(AppError::QueryFailure)?;

        Ok(HistoricalDataset {
            recent: recent.into_iter().map(RecentReading::from).collect(),
            weekly: weekly.into_iter().map(DailyRange::from).collect(),
        })
    }

    pub async fn load_summary(&self) -> Result<WeatherSummary, AppError> {
        let rainy_days = queries::count_rainy_days(&self.pool, HISTORY_DAYS)
            .await
            .map_err(AppError::QueryFailure)?;
        let warm_days = queries::count_warm_days(
            &self.pool,
            HISTORY_DAYS,
            Decimal::from(WARM_DAY_THRESHOLD_C),
        )
        .await
        .map_err(AppError::QueryFailure)?;
        let cold_days = queries::count_cold_days(
            &self.pool,
            HISTORY_DAYS,
            Decimal::from(COLD_DAY_THRESHOLD_C),
        )
        .await
        .map_err(AppError::QueryFailure)?;
        let average_temperature_c =
            queries::hourly_average_temperature(&self.pool, AVERAGE_WINDOW_HOURS)
                .await
                .map_err(AppError::QueryFailure)?;

        Ok(WeatherSummary {
            rainy_days,
            warm_days,
            cold_days,
            average_temperature_c,
        })
    }
}
