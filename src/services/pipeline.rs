//! One dashboard refresh: fetch → extract → store → load history → render → write.
//!
//! Each stage handles its own failure: it is logged, and later stages still
//! run if their inputs are unaffected. A failed fetch does not stop the
//! dashboard from being rebuilt from what is already stored. Nothing is
//! retried.

use std::path::Path;

use crate::config::AppConfig;
use crate::db::models::HistoricalDataset;
use crate::db::Store;
use crate::errors::AppError;
use crate::services::extract::extract;
use crate::services::openweather::OpenWeatherClient;
use crate::services::report::render_or_fallback;

/// What a run managed to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub observation_stored: bool,
    pub report_written: bool,
}

/// Run one refresh cycle. Never fails: every fault is logged where it occurs.
pub async fn run(config: &AppConfig, client: &OpenWeatherClient, store: Option<&Store>) -> RunOutcome {
    let observation_stored = fetch_and_store(config, client, store).await;

    let report_written = match store {
        Some(store) => match publish_report(store, &config.output_path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Dashboard not generated: {}", e);
                false
            }
        },
        None => {
            tracing::error!(
                "Dashboard not generated: {}",
                AppError::StoreUnavailable
            );
            false
        }
    };

    RunOutcome {
        observation_stored,
        report_written,
    }
}

/// Fetch the current observation and store it. Returns whether a row was inserted.
async fn fetch_and_store(
    config: &AppConfig,
    client: &OpenWeatherClient,
    store: Option<&Store>,
) -> bool {
    let raw = match client
        .fetch_current(&config.latitude, &config.longitude)
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!("Failed to fetch weather data: {}", e);
            return false;
        }
    };

    let record = match extract(&raw) {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Failed to extract weather data: {}", e);
            return false;
        }
    };

    let Some(store) = store else {
        tracing::warn!("Observation not stored: {}", AppError::StoreUnavailable);
        return false;
    };

    match store.insert_observation(&record).await {
        Ok(id) => {
            tracing::info!("Observation stored with id={}", id);
            true
        }
        Err(e) => {
            tracing::error!("{}", e);
            false
        }
    }
}

/// Load history, log summary statistics, render and write the dashboard.
async fn publish_report(store: &Store, output_path: &Path) -> Result<(), AppError> {
    let dataset = store.load_history().await?;
    tracing::info!(
        "Loaded {} recent readings and {} daily ranges",
        dataset.recent.len(),
        dataset.weekly.len()
    );

    match store.load_summary().await {
        Ok(summary) => tracing::info!(
            "Last {} days: {} rainy, {} warm, {} cold; 24h average temperature: {}",
            crate::db::HISTORY_DAYS,
            summary.rainy_days,
            summary.warm_days,
            summary.cold_days,
            summary
                .average_temperature_c
                .map(|t| format!("{:.1}°C", t))
                .unwrap_or_else(|| "N/A".to_string())
        ),
        Err(e) => tracing::warn!("Summary statistics unavailable: {}", e),
    }

    render_and_write(&dataset, output_path)
}

/// Render the dataset (or the fixed failure message) and write it out.
pub fn render_and_write(dataset: &HistoricalDataset, output_path: &Path) -> Result<(), AppError> {
    let html = render_or_fallback(dataset);
    write_report(output_path, &html)?;
    tracing::info!("Dashboard written to {}", output_path.display());
    Ok(())
}

/// Write the document, creating parent directories and replacing any previous file.
pub fn write_report(path: &Path, html: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Reading, RecentReading};
    use crate::services::report::{
        condition_icon_url, render, EMPTY_PLACEHOLDER, RENDER_FAILURE_MESSAGE,
    };
    use chrono::{DateTime, Utc};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_url: &str, output_path: &Path) -> AppConfig {
        AppConfig {
            api_key: "KEY".to_string(),
            latitude: "45.58".to_string(),
            longitude: "9.5".to_string(),
            database_url: None,
            weather_api_url: api_url.to_string(),
            output_path: output_path.to_path_buf(),
        }
    }

    fn observation() -> serde_json::Value {
        serde_json::json!({
            "coord": { "lon": 9.5, "lat": 45.58 },
            "weather": [{ "main": "Clear", "description": "clear sky" }],
            "main": { "temp": 21.3, "pressure": 1013, "humidity": 55 },
            "wind": { "speed": 3.2 }
        })
    }

    #[test]
    fn test_extract_then_render_current_conditions() {
        let record = extract(&observation()).unwrap();
        assert_eq!(record.latitude, Reading::Value(45.58));
        assert_eq!(record.longitude, Reading::Value(9.5));

        let recorded_at: DateTime<Utc> = "2026-03-01T12:00:00Z".parse().unwrap();
        let reading = RecentReading {
            recorded_at,
            temperature_c: record.temperature_c,
            humidity_pct: record.humidity_pct,
            wind_speed_ms: record.wind_speed_ms,
            pressure_mbar: record.pressure_mbar,
            condition_text: record.condition_text.clone(),
        };
        let dataset = HistoricalDataset {
            recent: vec![reading; 12],
            weekly: Vec::new(),
        };

        let html = render(&dataset).unwrap();

        assert!(html.contains("<p id=\"temperature\">21.3°C</p>"));
        assert!(html.contains("<p id=\"humidity\">55%</p>"));
        assert!(html.contains("<p id=\"wind\">3.2 m/s</p>"));
        assert!(html.contains("<p id=\"pressure\">1013 mbar</p>"));
        assert!(html.contains("<p>Clear</p>"));
        assert!(html.contains(condition_icon_url(&Reading::Value("Clear".to_string()))));
        assert!(html.contains("https://cdn.weatherapi.com/weather/64x64/day/113.png"));
    }

    #[test]
    fn test_write_report_creates_dir_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs").join("index.html");

        write_report(&path, "<p>first</p>").unwrap();
        write_report(&path, "<p>second</p>").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>second</p>");
    }

    fn recent_from_observation(count: usize) -> Vec<RecentReading> {
        let record = extract(&observation()).unwrap();
        let reading = RecentReading {
            recorded_at: "2026-03-01T12:00:00Z".parse().unwrap(),
            temperature_c: record.temperature_c,
            humidity_pct: record.humidity_pct,
            wind_speed_ms: record.wind_speed_ms,
            pressure_mbar: record.pressure_mbar,
            condition_text: record.condition_text,
        };
        vec![reading; count]
    }

    #[test]
    fn test_render_and_write_short_history_writes_failure_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs").join("index.html");
        let dataset = HistoricalDataset {
            recent: recent_from_observation(5),
            weekly: Vec::new(),
        };

        render_and_write(&dataset, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), RENDER_FAILURE_MESSAGE);
    }

    #[test]
    fn test_render_and_write_full_history_writes_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        let dataset = HistoricalDataset {
            recent: recent_from_observation(12),
            weekly: Vec::new(),
        };

        render_and_write(&dataset, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert_eq!(written.matches("<tr class=\"hourly-row\">").count(), 12);
    }

    #[test]
    fn test_render_and_write_empty_history_writes_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");

        render_and_write(&HistoricalDataset::default(), &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), EMPTY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_run_without_store_fetches_but_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observation()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("docs").join("index.html");
        let config = test_config(&server.uri(), &output);
        let client = OpenWeatherClient::new(&config.weather_api_url, &config.api_key);

        let outcome = run(&config, &client, None).await;

        assert_eq!(outcome, RunOutcome::default());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_run_survives_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), &dir.path().join("index.html"));
        let client = OpenWeatherClient::new(&config.weather_api_url, &config.api_key);

        let outcome = run(&config, &client, None).await;

        assert!(!outcome.observation_stored);
        assert!(!outcome.report_written);
    }
}
