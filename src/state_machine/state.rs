//! Dialogue state types

use std::fmt;

/// Identifies one user's dialogue within one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl ConversationKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

// ============================================================================
// Dialogue State
// ============================================================================

/// Form-filling dialogue state; each variant carries what has been collected
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    /// No route query in progress
    #[default]
    Idle,

    /// Waiting for the first city of the route
    AwaitingStartCity,

    /// Waiting for the last city of the route
    AwaitingEndCity { start_city: String },

    /// Waiting for intermediate stops (text) or a skip/add choice
    AwaitingMidpoints { start_city: String, end_city: String },

    /// Waiting for the 3/5 day choice
    AwaitingForecastLength {
        start_city: String,
        end_city: String,
        midpoints: Vec<String>,
    },
}

impl DialogState {
    pub fn name(&self) -> &'static str {
        match self {
            DialogState::Idle => "idle",
            DialogState::AwaitingStartCity => "awaiting_start_city",
            DialogState::AwaitingEndCity { .. } => "awaiting_end_city",
            DialogState::AwaitingMidpoints { .. } => "awaiting_midpoints",
            DialogState::AwaitingForecastLength { .. } => "awaiting_forecast_length",
        }
    }
}

/// Per-conversation dialogue session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub conversation: ConversationKey,
    pub state: DialogState,
}

impl Session {
    pub fn new(conversation: ConversationKey) -> Self {
        Self {
            conversation,
            state: DialogState::Idle,
        }
    }
}

// ============================================================================
// Route
// ============================================================================

/// Ordered list of cities: start, intermediate stops, end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    cities: Vec<String>,
}

impl Route {
    pub fn new(start_city: String, midpoints: Vec<String>, end_city: String) -> Self {
        let mut cities = Vec::with_capacity(midpoints.len() + 2);
        cities.push(start_city);
        cities.extend(midpoints);
        cities.push(end_city);
        Self { cities }
    }

    /// Always at least two entries
    pub fn cities(&self) -> &[String] {
        &self.cities
    }
}
