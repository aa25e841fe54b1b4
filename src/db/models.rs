use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;

use crate::helpers::opt_dec_to_f64;

/// Marker rendered wherever a measurement is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

/// A single measurement that may be missing from the source data.
///
/// `Unavailable` is an explicit value, never an omitted field: every record
/// carries its full field set. Stored as SQL `NULL`, displayed and serialized
/// as `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reading<T> {
    Value(T),
    #[default]
    Unavailable,
}

impl<T> Reading<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Reading::Unavailable, Reading::Value)
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => v.fmt(f),
            Reading::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => v.serialize(serializer),
            Reading::Unavailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// One observation, normalized from the provider payload and ready to store.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NormalizedRecord {
    pub latitude: Reading<f64>,
    pub longitude: Reading<f64>,
    pub temperature_c: Reading<f64>,
    pub pressure_mbar: Reading<i32>,
    pub humidity_pct: Reading<i32>,
    pub wind_speed_ms: Reading<f64>,
    pub condition_text: Reading<String>,
}

/// A stored observation, as read back for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentReading {
    pub recorded_at: DateTime<Utc>,
    pub temperature_c: Reading<f64>,
    pub humidity_pct: Reading<i32>,
    pub wind_speed_ms: Reading<f64>,
    pub pressure_mbar: Reading<i32>,
    pub condition_text: Reading<String>,
}

/// Per-day temperature range.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRange {
    pub day: NaiveDate,
    pub min_temperature_c: Reading<f64>,
    pub max_temperature_c: Reading<f64>,
}

/// Everything the dashboard is rendered from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalDataset {
    /// Most-recent-first.
    pub recent: Vec<RecentReading>,
    /// In the order the store returned them.
    pub weekly: Vec<DailyRange>,
}

impl HistoricalDataset {
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.weekly.is_empty()
    }
}

/// Row shape of the recent-readings query.
#[derive(Debug, Clone, FromRow)]
pub struct RecentReadingRow {
    pub created_at: DateTime<Utc>,
    pub temperature_c: Option<Decimal>,
    pub humidity_pct: Option<i32>,
    pub wind_speed_ms: Option<Decimal>,
    pub pressure_mbar: Option<i32>,
    pub condition_text: Option<String>,
}

impl From<RecentReadingRow> for RecentReading {
    fn from(row: RecentReadingRow) -> Self {
        Self {
            recorded_at: row.created_at,
            temperature_c: opt_dec_to_f64(row.temperature_c).into(),
            humidity_pct: row.humidity_pct.into(),
            wind_speed_ms: opt_dec_to_f64(row.wind_speed_ms).into(),
            pressure_mbar: row.pressure_mbar.into(),
            condition_text: row.condition_text.into(),
        }
    }
}

/// Row shape of the daily min/max aggregate query.
#[derive(Debug, Clone, FromRow)]
pub struct DailyRangeRow {
    pub day: NaiveDate,
    pub min_temperature_c: Option<Decimal>,
    pub max_temperature_c: Option<Decimal>,
}

impl From<DailyRangeRow> for DailyRange {
    fn from(row: DailyRangeRow) -> Self {
        Self {
            day: row.day,
            min_temperature_c: opt_dec_to_f64(row.min_temperature_c).into(),
            max_temperature_c: opt_dec_to_f64(row.max_temperature_c).into(),
        }
    }
}
