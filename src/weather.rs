//! Weather provider abstraction
//!
//! Resolves city names to provider location keys and fetches daily forecasts.

mod accuweather;
pub mod error;
pub mod types;

pub use accuweather::AccuWeatherService;
pub use error::WeatherError;
pub use types::{DayForecast, LocationKey};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for weather providers
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Resolve a city name to a location key.
    ///
    /// Returns `Ok(None)` when the provider rejects the lookup or finds no
    /// match. When several places match, the first one wins.
    async fn resolve_location(&self, city: &str) -> Result<Option<LocationKey>, WeatherError>;

    /// Fetch at most `days` daily forecasts for a resolved location, in
    /// provider order. A rejected request yields an empty list.
    async fn fetch_forecast(
        &self,
        location: &LocationKey,
        days: usize,
    ) -> Result<Vec<DayForecast>, WeatherError>;
}

#[async_trait]
impl<T: WeatherService + ?Sized> WeatherService for Arc<T> {
    async fn resolve_location(&self, city: &str) -> Result<Option<LocationKey>, WeatherError> {
        (**self).resolve_location(city).await
    }

    async fn fetch_forecast(
        &self,
        location: &LocationKey,
        days: usize,
    ) -> Result<Vec<DayForecast>, WeatherError> {
        (**self).fetch_forecast(location, days).await
    }
}

/// Logging wrapper for weather services
pub struct LoggingService<W> {
    inner: W,
}

impl<W: WeatherService> LoggingService<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<W: WeatherService> WeatherService for LoggingService<W> {
    async fn resolve_location(&self, city: &str) -> Result<Option<LocationKey>, WeatherError> {
        let start = std::time::Instant::now();
        let result = self.inner.resolve_location(city).await;
        let duration = start.elapsed();

        match &result {
            Ok(Some(key)) => {
                tracing::info!(
                    city = %city,
                    location = %key,
                    duration_ms = %duration.as_millis(),
                    "Location resolved"
                );
            }
            Ok(None) => {
                tracing::warn!(
                    city = %city,
                    duration_ms = %duration.as_millis(),
                    "Location not found"
                );
            }
            Err(e) => {
                tracing::error!(
                    city = %city,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Location lookup failed"
                );
            }
        }

        result
    }

    async fn fetch_forecast(
        &self,
        location: &LocationKey,
        days: usize,
    ) -> Result<Vec<DayForecast>, WeatherError> {
        let start = std::time::Instant::now();
        let result = self.inner.fetch_forecast(location, days).await;
        let duration = start.elapsed();

        match &result {
            Ok(forecast) => {
                tracing::info!(
                    location = %location,
                    requested_days = days,
                    returned_days = forecast.len(),
                    duration_ms = %duration.as_millis(),
                    "Forecast fetched"
                );
            }
            Err(e) => {
                tracing::error!(
                    location = %location,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Forecast request failed"
                );
            }
        }

        result
    }
}
