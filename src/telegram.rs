//! Telegram transport
//!
//! Long-polls the Bot API, turns updates into dialogue events and hands them
//! to the session manager. Outbound replies go through [`TelegramClient`],
//! which implements [`ChatTransport`](crate::runtime::ChatTransport).

mod client;
pub mod types;

pub use client::TelegramClient;

use crate::runtime::SessionManager;
use crate::state_machine::{Choice, ConversationKey, Event};
use crate::weather::WeatherService;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use types::{CallbackQuery, Message, Update};

/// Pause after a failed poll before trying again
const POLL_ERROR_DELAY: Duration = Duration::from_secs(5);

/// Poll for updates until `shutdown` is cancelled
pub async fn run_polling<W>(
    client: Arc<TelegramClient>,
    sessions: Arc<SessionManager<W, TelegramClient>>,
    shutdown: CancellationToken,
) where
    W: WeatherService + 'static,
{
    tracing::info!("Polling Telegram for updates");
    let mut offset = 0;

    loop {
        let updates = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            result = client.get_updates(offset) => result,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch updates");
                tokio::select! {
                    biased;
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(POLL_ERROR_DELAY) => continue,
                }
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            handle_update(&client, &sessions, &update).await;
        }
    }

    let sessions = sessions.session_count().await;
    tracing::info!(sessions, "Stopped polling");
}

async fn handle_update<W>(
    client: &TelegramClient,
    sessions: &SessionManager<W, TelegramClient>,
    update: &Update,
) where
    W: WeatherService + 'static,
{
    // Acknowledge button presses so the client stops its spinner, even when
    // the payload turns out to be unusable
    if let Some(callback) = &update.callback_query {
        if let Err(e) = client.answer_callback_query(&callback.id).await {
            tracing::warn!(error = %e, "Failed to answer callback query");
        }
    }

    match update_to_event(update) {
        Some((conversation, event)) => sessions.dispatch(conversation, event).await,
        None => tracing::debug!(update_id = update.update_id, "Skipping update"),
    }
}

/// Map an update onto the conversation it belongs to and the event it carries
pub fn update_to_event(update: &Update) -> Option<(ConversationKey, Event)> {
    if let Some(message) = &update.message {
        return message_to_event(message);
    }
    update.callback_query.as_ref().and_then(callback_to_event)
}

fn message_to_event(message: &Message) -> Option<(ConversationKey, Event)> {
    let text = message.text.as_deref()?;
    let user_id = message.from.as_ref().map_or(message.chat.id, |u| u.id);
    Some((
        ConversationKey::new(message.chat.id, user_id),
        Event::from_message_text(text),
    ))
}

fn callback_to_event(callback: &CallbackQuery) -> Option<(ConversationKey, Event)> {
    let chat_id = callback.message.as_ref()?.chat.id;
    let choice = Choice::from_callback_data(callback.data.as_deref()?)?;
    Some((
        ConversationKey::new(chat_id, callback.from.id),
        Event::Choice(choice),
    ))
}
