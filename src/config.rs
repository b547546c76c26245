//! Startup configuration read from the process environment

use thiserror::Error;

pub const DEFAULT_ACCUWEATHER_BASE_URL: &str = "https://dataservice.accuweather.com";
pub const DEFAULT_ACCUWEATHER_LANGUAGE: &str = "en-us";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_TIMEOUT_SECS: u32 = 30;

/// Configuration errors are fatal at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the AccuWeather client
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
}

#[cfg(test)]
impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_ACCUWEATHER_BASE_URL.to_string(),
            language: DEFAULT_ACCUWEATHER_LANGUAGE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Settings for the Telegram Bot API client
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_url: String,
    pub poll_timeout_secs: u32,
}

/// Full bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub weather: WeatherConfig,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let token = required("TELEGRAM_API_TOKEN")?;
        let api_key = required("ACCUWEATHER_API_TOKEN")?;

        let poll_timeout_secs = match lookup("TELEGRAM_POLL_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "TELEGRAM_POLL_TIMEOUT_SECS",
                value: raw.clone(),
            })?,
            None => DEFAULT_POLL_TIMEOUT_SECS,
        };

        Ok(Self {
            telegram: TelegramConfig {
                token,
                api_url: optional("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL),
                poll_timeout_secs,
            },
            weather: WeatherConfig {
                api_key,
                base_url: optional("ACCUWEATHER_BASE_URL", DEFAULT_ACCUWEATHER_BASE_URL),
                language: optional("ACCUWEATHER_LANGUAGE", DEFAULT_ACCUWEATHER_LANGUAGE),
            },
        })
    }
}
