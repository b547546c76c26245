//! Route forecast aggregation
//!
//! Queries the weather provider for every city on a route, in order, and
//! collects one result per city.

mod report;

pub use report::format_report;

use crate::weather::{DayForecast, WeatherError, WeatherService};

/// Forecast horizon offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastDays {
    Three,
    Five,
}

impl ForecastDays {
    pub fn count(self) -> usize {
        match self {
            ForecastDays::Three => 3,
            ForecastDays::Five => 5,
        }
    }
}

/// Forecast for one city on the route
#[derive(Debug, Clone, PartialEq)]
pub struct CityForecast {
    pub location: String,
    pub outcome: ForecastOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    /// The city could not be resolved or the provider returned no days
    NoData,
    Days { days: Vec<DayForecast> },
}

impl CityForecast {
    pub fn no_data(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            outcome: ForecastOutcome::NoData,
        }
    }

    pub fn days(location: impl Into<String>, days: Vec<DayForecast>) -> Self {
        Self {
            location: location.into(),
            outcome: ForecastOutcome::Days { days },
        }
    }
}

/// Builds per-city forecasts for a route
pub struct Forecaster<W> {
    weather: W,
}

impl<W: WeatherService> Forecaster<W> {
    pub fn new(weather: W) -> Self {
        Self { weather }
    }

    /// Generate forecasts for `cities`, one result per city in input order.
    ///
    /// A city that cannot be resolved becomes a no-data entry and never
    /// affects the others. Transport and payload failures abort the whole
    /// report.
    pub async fn generate(
        &self,
        cities: &[String],
        days: ForecastDays,
    ) -> Result<Vec<CityForecast>, WeatherError> {
        let mut forecasts = Vec::with_capacity(cities.len());

        for city in cities {
            let Some(location) = self.weather.resolve_location(city).await? else {
                forecasts.push(CityForecast::no_data(city.as_str()));
                continue;
            };

            let mut city_days = self.weather.fetch_forecast(&location, days.count()).await?;
            city_days.truncate(days.count());

            if city_days.is_empty() {
                forecasts.push(CityForecast::no_data(city.as_str()));
            } else {
                forecasts.push(CityForecast::days(city.as_str(), city_days));
            }
        }

        Ok(forecasts)
    }
}
