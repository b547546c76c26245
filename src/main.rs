//! Route forecast bot
//!
//! A Telegram bot that walks a user through describing a route (start city,
//! optional stops, destination, forecast length) and replies with the daily
//! weather forecast for every city along it.

mod config;
mod forecast;
mod runtime;
mod state_machine;
mod telegram;
mod weather;

use config::BotConfig;
use forecast::Forecaster;
use runtime::SessionManager;
use std::sync::Arc;
use telegram::TelegramClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather::{AccuWeatherService, LoggingService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_forecast_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = BotConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    tracing::info!(
        weather_api = %config.weather.base_url,
        language = %config.weather.language,
        poll_timeout_secs = config.telegram.poll_timeout_secs,
        "Configuration loaded"
    );

    let weather = LoggingService::new(AccuWeatherService::new(&config.weather)?);
    let client = Arc::new(TelegramClient::new(&config.telegram)?);
    let sessions = Arc::new(SessionManager::new(Forecaster::new(weather), client.clone()));

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        });
    }

    telegram::run_polling(client, sessions, shutdown).await;

    Ok(())
}
