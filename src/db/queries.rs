use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{DailyRangeRow, NormalizedRecord, RecentReadingRow};
use crate::helpers::{opt_dec_to_f64, opt_f64_to_decimal};

/// Insert one normalized observation (append-only). Unavailable fields are stored as NULL.
pub async fn insert_observation(
    pool: &PgPool,
    record: &NormalizedRecord,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO weather_data (
            id, lat, lon, temperature_c, pressure_mbar, humidity_pct,
            wind_speed_ms, condition_text, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())",
    )
    .bind(id)
    .bind(opt_f64_to_decimal(record.latitude.into_option()))
    .bind(opt_f64_to_decimal(record.longitude.into_option()))
    .bind(opt_f64_to_decimal(record.temperature_c.into_option()))
    .bind(record.pressure_mbar.into_option())
    .bind(record.humidity_pct.into_option())
    .bind(opt_f64_to_decimal(record.wind_speed_ms.into_option()))
    .bind(record.condition_text.as_option().map(String::as_str))
    .execute(pool)
    .await?;

    Ok(id)
}

/// The `limit` most recent observations, newest first.
pub async fn get_recent_readings(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<RecentReadingRow>, sqlx::Error> {
    sqlx::query_as::<_, RecentReadingRow>(
        "SELECT created_at, temperature_c, humidity_pct, wind_speed_ms,
                pressure_mbar, condition_text
         FROM weather_data
         ORDER BY created_at DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Per-day min/max temperature over the last `days` days, newest day first.
pub async fn get_daily_ranges(pool: &PgPool, days: i32) -> Result<Vec<DailyRangeRow>, sqlx::Error> {
    sqlx::query_as::<_, DailyRangeRow>(
        "SELECT (created_at AT TIME ZONE 'UTC')::date AS day,
                MIN(temperature_c) AS min_temperature_c,
                MAX(temperature_c) AS max_temperature_c
         FROM weather_data
         WHERE created_at >= NOW() - make_interval(days => $1)
         GROUP BY day
         ORDER BY day DESC
         LIMIT $1",
    )
    .bind(days)
    .fetch_all(pool)
    .await
}

/// Number of distinct days in the window with at least one rainy observation.
pub async fn count_rainy_days(pool: &PgPool, days: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT (created_at AT TIME ZONE 'UTC')::date)
         FROM weather_data
         WHERE created_at >= NOW() - make_interval(days => $1)
           AND condition_text ILIKE '%rain%'",
    )
    .bind(days)
    .fetch_one(pool)
    .await
}

/// Number of days in the window whose maximum temperature reached `threshold_c`.
pub async fn count_warm_days(
    pool: &PgPool,
    days: i32,
    threshold_c: Decimal,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM (
             SELECT (created_at AT TIME ZONE 'UTC')::date AS day
             FROM weather_data
             WHERE created_at >= NOW() - make_interval(days => $1)
             GROUP BY day
             HAVING MAX(temperature_c) >= $2
         ) AS warm",
    )
    .bind(days)
    .bind(threshold_c)
    .fetch_one(pool)
    .await
}

/// Number of days in the window whose minimum temperature fell to `threshold_c`.
pub async fn count_cold_days(
    pool: &PgPool,
    days: i32,
    threshold_c: Decimal,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM (
             SELECT (created_at AT TIME ZONE 'UTC')::date AS day
             FROM weather_data
             WHERE created_at >= NOW() - make_interval(days => $1)
             GROUP BY day
             HAVING MIN(temperature_c) <= $2
         ) AS cold",
    )
    .bind(days)
    .bind(threshold_c)
    .fetch_one(pool)
    .await
}

/// Average temperature over the last `hours` hours; `None` when nothing was recorded.
pub async fn hourly_average_temperature(pool: &PgPool, hours: i32) -> Result<Option<f64>, sqlx::Error> {
    let avg = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT AVG(temperature_c)
         FROM weather_data
         WHERE created_at >= NOW() - make_interval(hours => $1)",
    )
    .bind(hours)
    .fetch_one(pool)
    .await?;

    Ok(opt_dec_to_f64(avg))
}
