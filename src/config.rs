use std::path::PathBuf;

/// Default observation point (latitude), used when `LATITUDE` is unset.
const DEFAULT_LATITUDE: &str = "45.58";
/// Default observation point (longitude), used when `LONGITUDE` is unset.
const DEFAULT_LONGITUDE: &str = "9.5";
const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org";
const DEFAULT_OUTPUT_PATH: &str = "docs/index.html";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenWeatherMap API key. Passed through unvalidated; an empty key
    /// surfaces as an auth failure from the provider.
    pub api_key: String,
    pub latitude: String,
    pub longitude: String,
    /// Postgres connection string. `None` means storage is unavailable.
    pub database_url: Option<String>,
    pub weather_api_url: String,
    /// Where the rendered dashboard is written.
    pub output_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("API_KEY").unwrap_or_default(),
            latitude: std::env::var("LATITUDE").unwrap_or_else(|_| DEFAULT_LATITUDE.to_string()),
            longitude: std::env::var("LONGITUDE")
                .unwrap_or_else(|_| DEFAULT_LONGITUDE.to_string()),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            weather_api_url: std::env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_API_URL.to_string()),
            output_path: std::env::var("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_PATH)),
        }
    }
}
