//! Weather provider error types

use thiserror::Error;

/// Weather provider error with classification
///
/// Non-success HTTP statuses are not errors: they surface as an unresolved
/// location or an empty forecast. This type covers failures that leave the
/// caller without a usable answer at all.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct WeatherError {
    pub kind: WeatherErrorKind,
    pub message: String,
}

impl WeatherError {
    pub fn new(kind: WeatherErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(WeatherErrorKind::Network, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(WeatherErrorKind::InvalidResponse, message)
    }

    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("Request timeout: {err}"))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            Self::invalid_response(format!("Failed to decode response: {err}"))
        } else {
            Self::network(format!("Request failed: {err}"))
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherErrorKind {
    /// Connection failures, timeouts, unreadable bodies
    Network,
    /// Body that does not match the provider's documented shape
    InvalidResponse,
}

impl WeatherErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::InvalidResponse => "invalid_response",
        }
    }
}
