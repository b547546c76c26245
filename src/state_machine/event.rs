//! Inputs that can occur in a dialogue

use crate::forecast::ForecastDays;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A bot command such as `/weather`
    Command(Command),
    /// Free text typed by the user
    Text { text: String },
    /// A choice button pressed by the user
    Choice(Choice),
}

impl Event {
    /// Classify an incoming message: known commands win over free text
    pub fn from_message_text(text: &str) -> Self {
        Command::parse(text).map_or_else(
            || Event::Text {
                text: text.to_string(),
            },
            Event::Command,
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Event::Command(Command::Start) => "command_start",
            Event::Command(Command::Help) => "command_help",
            Event::Command(Command::Weather) => "command_weather",
            Event::Text { .. } => "text",
            Event::Choice(choice) => choice.callback_data(),
        }
    }
}

/// Bot commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Weather,
}

impl Command {
    /// Parse `/name`, `/name@BotName` and `/name args`; unknown names are not commands
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim_start().split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split_once('@').map_or(name, |(name, _bot)| name);
        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "weather" => Some(Command::Weather),
            _ => None,
        }
    }
}

/// Choice buttons offered during the dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    AddMidpoints,
    SkipMidpoints,
    ForecastDays(ForecastDays),
}

impl Choice {
    /// Payload carried by the button
    pub fn callback_data(self) -> &'static str {
        match self {
            Choice::AddMidpoints => "add_midpoints",
            Choice::SkipMidpoints => "skip_midpoints",
            Choice::ForecastDays(ForecastDays::Three) => "3_days",
            Choice::ForecastDays(ForecastDays::Five) => "5_days",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            "add_midpoints" => Some(Choice::AddMidpoints),
            "skip_midpoints" => Some(Choice::SkipMidpoints),
            "3_days" => Some(Choice::ForecastDays(ForecastDays::Three)),
            "5_days" => Some(Choice::ForecastDays(ForecastDays::Five)),
            _ => None,
        }
    }

    /// Button label shown to the user
    pub fn label(self) -> &'static str {
        match self {
            Choice::AddMidpoints => "Add intermediate stops",
            Choice::SkipMidpoints => "Skip",
            Choice::ForecastDays(ForecastDays::Three) => "3 days",
            Choice::ForecastDays(ForecastDays::Five) => "5 days",
        }
    }
}
