// Weather Dashboard v0.1
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod errors;
mod helpers;
mod services;

use config::AppConfig;
use db::Store;
use services::openweather::OpenWeatherClient;

/// One refresh per invocation, run to completion on the current thread.
/// Failures are logged by the stage that hit them; the exit status is always 0.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env file is fine; the process environment is used as-is.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_dashboard=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    let config = AppConfig::from_env();

    let store = match Store::connect(&config).await {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::error!("Database not available: {}", e);
            None
        }
    };

    let client = OpenWeatherClient::new(&config.weather_api_url, &config.api_key);

    let outcome = services::pipeline::run(&config, &client, store.as_ref()).await;
    tracing::info!(
        "Run finished: observation stored: {}, dashboard written: {}",
        outcome.observation_stored,
        outcome.report_written
    );
}
