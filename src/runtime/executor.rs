//! Conversation runtime executor

use super::traits::{ChatTransport, TransportError};
use crate::forecast::{format_report, Forecaster};
use crate::state_machine::{transition, ConversationKey, DialogState, Effect, Event, Session};
use crate::weather::WeatherService;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const FAILURE_NOTICE: &str = "Something went wrong. Please try again later.";

/// Runs one conversation: applies transitions and executes their effects
pub struct ConversationRuntime<W, T>
where
    W: WeatherService + 'static,
    T: ChatTransport + 'static,
{
    session: Session,
    forecaster: Arc<Forecaster<W>>,
    transport: Arc<T>,
    event_rx: mpsc::Receiver<Event>,
}

impl<W, T> ConversationRuntime<W, T>
where
    W: WeatherService + 'static,
    T: ChatTransport + 'static,
{
    pub fn new(
        conversation: ConversationKey,
        forecaster: Arc<Forecaster<W>>,
        transport: Arc<T>,
        event_rx: mpsc::Receiver<Event>,
    ) -> Self {
        Self {
            session: Session::new(conversation),
            forecaster,
            transport,
            event_rx,
        }
    }

    pub fn conversation(&self) -> ConversationKey {
        self.session.conversation
    }

    #[cfg(test)]
    pub fn state(&self) -> &DialogState {
        &self.session.state
    }

    /// Process events until the dialogue is back at `Idle`.
    ///
    /// Returns `false` once every sender is gone. One event runs at a time:
    /// a forecast request finishes before the next input is looked at.
    pub async fn run_until_idle(&mut self) -> bool {
        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event).await;
            if self.session.state == DialogState::Idle {
                return true;
            }
        }
        false
    }

    pub fn has_pending_events(&self) -> bool {
        !self.event_rx.is_empty()
    }

    pub async fn process_event(&mut self, event: Event) {
        let conversation = self.session.conversation;
        let input = event.describe();

        let result = match transition(&self.session.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    conversation = %conversation,
                    input,
                    error = %e,
                    "Ignoring input"
                );
                return;
            }
        };

        let old_state = std::mem::replace(&mut self.session.state, result.new_state);
        if old_state.name() != self.session.state.name() {
            tracing::debug!(
                conversation = %conversation,
                input,
                from = old_state.name(),
                to = self.session.state.name(),
                "Dialogue state changed"
            );
        }

        for effect in result.effects {
            if let Err(e) = self.execute_effect(effect).await {
                tracing::warn!(conversation = %conversation, error = %e, "Failed to deliver reply");
            }
        }
    }

    async fn execute_effect(&self, effect: Effect) -> Result<(), TransportError> {
        let conversation = self.session.conversation;
        match effect {
            Effect::SendText { text } => self.transport.send_text(conversation, &text).await,

            Effect::SendChoices { text, choices } => {
                self.transport
                    .send_choices(conversation, &text, &choices)
                    .await
            }

            Effect::GenerateForecast { route, days } => {
                tracing::info!(
                    conversation = %conversation,
                    cities = ?route.cities(),
                    days = days.count(),
                    "Generating route forecast"
                );

                let reply = match self.forecaster.generate(route.cities(), days).await {
                    Ok(results) => format_report(&results),
                    Err(e) => {
                        tracing::error!(
                            conversation = %conversation,
                            kind = e.kind.as_str(),
                            error = %e,
                            "Forecast generation failed"
                        );
                        FAILURE_NOTICE.to_string()
                    }
                };

                self.transport.send_text(conversation, &reply).await
            }
        }
    }
}
