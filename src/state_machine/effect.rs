//! Effects produced by state transitions

use super::event::Choice;
use super::state::Route;
use crate::forecast::ForecastDays;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Reply with plain text
    SendText { text: String },

    /// Reply with text and a row of choice buttons
    SendChoices { text: String, choices: Vec<Choice> },

    /// Fetch forecasts for the route and reply with the report
    GenerateForecast { route: Route, days: ForecastDays },
}

impl Effect {
    pub fn send_text(text: impl Into<String>) -> Self {
        Effect::SendText { text: text.into() }
    }

    pub fn send_choices(text: impl Into<String>, choices: impl IntoIterator<Item = Choice>) -> Self {
        Effect::SendChoices {
            text: text.into(),
            choices: choices.into_iter().collect(),
        }
    }
}
