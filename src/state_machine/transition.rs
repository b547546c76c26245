//! Pure state transition function

use super::event::{Choice, Command};
use super::state::Route;
use super::{DialogState, Effect, Event};
use crate::forecast::ForecastDays;
use thiserror::Error;

pub const GREETING: &str =
    "Hi👋! I can give you the weather forecast for your route. Use /weather to get started.";
pub const HELP: &str = "Commands:\n\
    /start - Start working with the bot🎬\n\
    /help - Show this help ℹ️\n\
    /weather - Get a forecast for your route🌦";
pub const IDLE_HINT: &str = "Use /weather to get a forecast for your route.";
pub const PROMPT_START_CITY: &str = "Enter the start city:";
pub const PROMPT_END_CITY: &str = "Enter the end city:";
pub const PROMPT_MIDPOINTS_CHOICE: &str = "Would you like to add intermediate cities?➕";
pub const PROMPT_MIDPOINTS: &str = "Enter intermediate cities separated by commas:";
pub const NO_MIDPOINTS: &str = "The route will be built without intermediate stops.";
pub const PROMPT_FORECAST_LENGTH: &str = "Choose the forecast length:";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DialogState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DialogState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Choice {choice} is not available in state {state}")]
    StaleChoice {
        state: &'static str,
        choice: &'static str,
    },
    #[error("Text input is not expected in state {0}")]
    UnexpectedText(&'static str),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(state: &DialogState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Commands (accepted in every state)
        // ============================================================
        (_, Event::Command(Command::Weather)) => {
            Ok(TransitionResult::new(DialogState::AwaitingStartCity)
                .with_effect(Effect::send_text(PROMPT_START_CITY)))
        }

        (_, Event::Command(Command::Start)) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::send_text(GREETING)))
        }

        (_, Event::Command(Command::Help)) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::send_text(HELP)))
        }

        // ============================================================
        // Route collection
        // ============================================================
        (DialogState::Idle, Event::Text { .. }) => {
            Ok(TransitionResult::new(DialogState::Idle).with_effect(Effect::send_text(IDLE_HINT)))
        }

        (DialogState::AwaitingStartCity, Event::Text { text }) => {
            Ok(TransitionResult::new(DialogState::AwaitingEndCity { start_city: text })
                .with_effect(Effect::send_text(PROMPT_END_CITY)))
        }

        (DialogState::AwaitingEndCity { start_city }, Event::Text { text }) => {
            Ok(TransitionResult::new(DialogState::AwaitingMidpoints {
                start_city: start_city.clone(),
                end_city: text,
            })
            .with_effect(Effect::send_choices(
                PROMPT_MIDPOINTS_CHOICE,
                [Choice::AddMidpoints, Choice::SkipMidpoints],
            )))
        }

        (DialogState::AwaitingMidpoints { .. }, Event::Choice(Choice::AddMidpoints)) => {
            Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::send_text(PROMPT_MIDPOINTS)))
        }

        (
            DialogState::AwaitingMidpoints {
                start_city,
                end_city,
            },
            Event::Choice(Choice::SkipMidpoints),
        ) => Ok(TransitionResult::new(DialogState::AwaitingForecastLength {
            start_city: start_city.clone(),
            end_city: end_city.clone(),
            midpoints: vec![],
        })
        .with_effect(Effect::send_text(NO_MIDPOINTS))
        .with_effect(forecast_length_prompt())),

        (
            DialogState::AwaitingMidpoints {
                start_city,
                end_city,
            },
            Event::Text { text },
        ) => Ok(TransitionResult::new(DialogState::AwaitingForecastLength {
            start_city: start_city.clone(),
            end_city: end_city.clone(),
            midpoints: parse_midpoints(&text),
        })
        .with_effect(forecast_length_prompt())),

        // ============================================================
        // Forecast length -> report, back to Idle
        // ============================================================
        (
            DialogState::AwaitingForecastLength {
                start_city,
                end_city,
                midpoints,
            },
            Event::Choice(Choice::ForecastDays(days)),
        ) => {
            let route = Route::new(start_city.clone(), midpoints.clone(), end_city.clone());
            Ok(TransitionResult::new(DialogState::Idle)
                .with_effect(Effect::GenerateForecast { route, days }))
        }

        // ============================================================
        // Rejected inputs
        // ============================================================
        (_, Event::Choice(choice)) => Err(TransitionError::StaleChoice {
            state: state.name(),
            choice: choice.callback_data(),
        }),

        (DialogState::AwaitingForecastLength { .. }, Event::Text { .. }) => {
            Err(TransitionError::UnexpectedText(state.name()))
        }
    }
}

fn forecast_length_prompt() -> Effect {
    Effect::send_choices(
        PROMPT_FORECAST_LENGTH,
        [
            Choice::ForecastDays(ForecastDays::Three),
            Choice::ForecastDays(ForecastDays::Five),
        ],
    )
}

/// Split comma-separated city names, trimming whitespace and dropping empty entries
pub fn parse_midpoints(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .map(ToString::to_string)
        .collect()
}
