//! Dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition` maps a state and an event to a new state plus effects, and
//! the runtime performs the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Choice, Event};
pub use state::{ConversationKey, DialogState, Session};
pub use transition::transition;
