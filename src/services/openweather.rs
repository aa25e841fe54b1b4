//! OpenWeatherMap "current weather" client.
//!
//! See: https://openweathermap.org/current

use crate::errors::AppError;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetch the current observation for a coordinate, in metric units.
    ///
    /// Returns the body as untyped JSON; shaping it into a record is the
    /// extractor's job. Any non-2xx status or unparseable body is a
    /// `FetchFailure`.
    pub async fn fetch_current(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude),
                ("lon", longitude),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::FetchFailure(format!("OpenWeatherMap request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::FetchFailure(format!(
                "OpenWeatherMap returned HTTP {}",
                response.status()
            )));
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            AppError::FetchFailure(format!("OpenWeatherMap JSON parse error: {}", e))
        })
    }
}
