//! Normalizes a raw OpenWeatherMap payload into a storage-ready record.
//!
//! Two tiers of failure:
//! - a missing, null or mistyped value degrades that field to
//!   `Reading::Unavailable`;
//! - a payload of the wrong shape (not an object, a block of the wrong JSON
//!   type, an empty condition list) rejects the whole observation.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::db::models::{NormalizedRecord, Reading};

/// Errors that abort extraction. No record is produced.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("Invalid weather data format: expected a JSON object")]
    InvalidInputFormat,
    #[error("Missing field in weather data: {0}")]
    MissingField(String),
    #[error("Type error in weather data: {0}")]
    TypeMismatch(String),
}

// --- OpenWeatherMap response types (every block and value optional) ---

#[derive(Debug, Deserialize)]
struct OwPayload {
    coord: Option<OwCoord>,
    main: Option<OwMain>,
    wind: Option<OwWind>,
    weather: Option<Vec<OwCondition>>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    #[serde(default, deserialize_with = "lenient_f64")]
    temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pressure: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    humidity: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    #[serde(default, deserialize_with = "lenient_f64")]
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    /// Condition group, e.g. "Clear", "Rain".
    #[serde(default, deserialize_with = "lenient_string")]
    main: Option<String>,
    /// Free-text description, e.g. "light rain".
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
}

// Leaf values are never indexed into, so a value of the wrong JSON type is a
// missing measurement, not a malformed payload.

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}

/// Integers, including integral floats such as `55.0`. Anything else is `None`.
fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v.as_i64() {
        Some(i) => i32::try_from(i).ok(),
        None => v
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
            .map(|f| f as i32),
    }))
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|v| v.as_str().map(str::to_string)))
}

/// Extract a `NormalizedRecord` from a raw provider response.
///
/// Pure: the same payload always yields the same record.
pub fn extract(raw: &Value) -> Result<NormalizedRecord, ExtractError> {
    if !raw.is_object() {
        return Err(ExtractError::InvalidInputFormat);
    }

    let payload =
        OwPayload::deserialize(raw).map_err(|e| ExtractError::TypeMismatch(e.to_string()))?;

    let condition_text = match payload.weather {
        None => Reading::Unavailable,
        Some(conditions) => {
            let first = conditions
                .into_iter()
                .next()
                .ok_or_else(|| ExtractError::MissingField("weather[0]".to_string()))?;
            first.main.or(first.description).into()
        }
    };

    let coord = payload.coord.as_ref();
    let main = payload.main.as_ref();

    let record = NormalizedRecord {
        latitude: coord.and_then(|c| c.lat).into(),
        longitude: coord.and_then(|c| c.lon).into(),
        temperature_c: main.and_then(|m| m.temp).into(),
        pressure_mbar: main.and_then(|m| m.pressure).into(),
        humidity_pct: main.and_then(|m| m.humidity).into(),
        wind_speed_ms: payload.wind.as_ref().and_then(|w| w.speed).into(),
        condition_text,
    };

    match serde_json::to_string(&record) {
        Ok(json) => tracing::info!("Extracted observation: {}", json),
        Err(_) => tracing::info!("Extracted observation: {:?}", record),
    }

    Ok(record)
}
