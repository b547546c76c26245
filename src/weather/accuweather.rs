//! AccuWeather provider implementation

use super::types::{DayForecast, LocationKey, TemperatureUnit};
use super::{WeatherError, WeatherService};
use crate::config::WeatherConfig;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// AccuWeather service implementation
pub struct AccuWeatherService {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl AccuWeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        // Every request gets a fresh connection
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| WeatherError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<(reqwest::StatusCode, String), WeatherError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::network(format!("Failed to read response: {e}")))?;

        Ok((status, body))
    }
}

#[async_trait]
impl WeatherService for AccuWeatherService {
    async fn resolve_location(&self, city: &str) -> Result<Option<LocationKey>, WeatherError> {
        let url = format!("{}/locations/v1/cities/search", self.base_url);
        let (status, body) = self
            .get(
                &url,
                &[
                    ("apikey", self.api_key.as_str()),
                    ("q", city),
                    ("language", self.language.as_str()),
                ],
            )
            .await?;

        if !status.is_success() {
            tracing::error!(city = %city, status = %status, "Location lookup rejected");
            return Ok(None);
        }

        let candidates: Vec<SearchCandidate> = serde_json::from_str(&body).map_err(|e| {
            WeatherError::invalid_response(format!("Failed to parse location search: {e}"))
        })?;

        Ok(candidates.into_iter().next().map(|c| LocationKey::new(c.key)))
    }

    async fn fetch_forecast(
        &self,
        location: &LocationKey,
        days: usize,
    ) -> Result<Vec<DayForecast>, WeatherError> {
        let url = format!("{}/forecasts/v1/daily/5day/{}", self.base_url, location);
        let (status, body) = self
            .get(
                &url,
                &[
                    ("apikey", self.api_key.as_str()),
                    ("metric", "true"),
                    ("language", self.language.as_str()),
                ],
            )
            .await?;

        if !status.is_success() {
            tracing::error!(location = %location, status = %status, "Forecast request rejected");
            return Ok(vec![]);
        }

        let response: DailyForecastResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::invalid_response(format!("Failed to parse daily forecast: {e}"))
        })?;

        response
            .daily_forecasts
            .into_iter()
            .take(days)
            .map(normalize_day)
            .collect()
    }
}

fn normalize_day(day: AccuDailyForecast) -> Result<DayForecast, WeatherError> {
    Ok(DayForecast {
        date: parse_date(&day.date)?,
        temp_min: day.temperature.minimum.value,
        temp_max: day.temperature.maximum.value,
        // Requests are metric; the reported unit code is not consulted
        unit: TemperatureUnit::Celsius,
        condition: day.day.icon_phrase,
    })
}

/// Parse the calendar date out of a provider date-time such as
/// `2024-05-01T07:00:00+03:00`; the time of day is dropped.
fn parse_date(raw: &str) -> Result<NaiveDate, WeatherError> {
    let date = raw.split_once('T').map_or(raw, |(date, _)| date);
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| WeatherError::invalid_response(format!("Invalid forecast date {raw:?}: {e}")))
}

// AccuWeather API types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchCandidate {
    key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DailyForecastResponse {
    #[serde(default)]
    daily_forecasts: Vec<AccuDailyForecast>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccuDailyForecast {
    date: String,
    temperature: AccuTemperatureRange,
    day: AccuDayPart,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccuTemperatureRange {
    minimum: AccuTemperature,
    maximum: AccuTemperature,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccuTemperature {
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccuDayPart {
    icon_phrase: String,
}
