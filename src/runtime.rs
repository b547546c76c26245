//! Runtime for executing conversations
//!
//! Each conversation gets its own task fed by a channel, so inputs of one
//! user are handled strictly in order while different users proceed
//! concurrently. A task lives only while its dialogue is in progress: once
//! the conversation is back at `Idle` with nothing queued, the task ends and
//! its entry is removed.

mod executor;
pub mod traits;


pub use executor::ConversationRuntime;
pub use traits::*;

use crate::forecast::Forecaster;
use crate::state_machine::{ConversationKey, Event};
use crate::weather::WeatherService;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

const EVENT_CHANNEL_CAPACITY: usize = 32;

type RuntimeMap = Arc<RwLock<HashMap<ConversationKey, ConversationHandle>>>;

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ConversationHandle {
    pub event_tx: mpsc::Sender<Event>,
}

/// Manager for all conversation runtimes
pub struct SessionManager<W, T>
where
    W: WeatherService + 'static,
    T: ChatTransport + 'static,
{
    forecaster: Arc<Forecaster<W>>,
    transport: Arc<T>,
    runtimes: RuntimeMap,
}

impl<W, T> SessionManager<W, T>
where
    W: WeatherService + 'static,
    T: ChatTransport + 'static,
{
    pub fn new(forecaster: Forecaster<W>, transport: Arc<T>) -> Self {
        Self {
            forecaster: Arc::new(forecaster),
            transport,
            runtimes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn spawn_runtime(&self, conversation: ConversationKey) -> ConversationHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let runtime = ConversationRuntime::new(
            conversation,
            self.forecaster.clone(),
            self.transport.clone(),
            event_rx,
        );

        tokio::spawn(drive(runtime, self.runtimes.clone()));
        tracing::debug!(conversation = %conversation, "Created conversation session");

        ConversationHandle { event_tx }
    }

    /// Queue an event for a conversation, starting its runtime on first
    /// contact. Never waits on the conversation itself: when its queue is
    /// full the event is dropped.
    pub async fn dispatch(&self, conversation: ConversationKey, event: Event) {
        // Sends happen under the map lock so a runtime that is retiring
        // cannot miss an event queued behind its back
        let event = {
            let runtimes = self.runtimes.read().await;
            match runtimes.get(&conversation) {
                Some(handle) => match handle.event_tx.try_send(event) {
                    Ok(()) => return,
                    Err(TrySendError::Full(event)) => {
                        drop_event(conversation, &event);
                        return;
                    }
                    Err(TrySendError::Closed(event)) => event,
                },
                None => event,
            }
        };

        let mut runtimes = self.runtimes.write().await;
        let handle = match runtimes.get(&conversation) {
            Some(handle) if !handle.event_tx.is_closed() => handle.clone(),
            _ => {
                let handle = self.spawn_runtime(conversation);
                runtimes.insert(conversation, handle.clone());
                handle
            }
        };

        match handle.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => drop_event(conversation, &event),
            Err(TrySendError::Closed(_)) => {
                tracing::error!(conversation = %conversation, "Failed to deliver event");
            }
        }
    }

    /// Number of conversations with a dialogue in progress
    pub async fn session_count(&self) -> usize {
        self.runtimes.read().await.len()
    }
}

fn drop_event(conversation: ConversationKey, event: &Event) {
    tracing::warn!(
        conversation = %conversation,
        input = event.describe(),
        "Conversation busy, dropping input"
    );
}

/// Run a conversation until it settles at `Idle`, then retire it
async fn drive<W, T>(mut runtime: ConversationRuntime<W, T>, runtimes: RuntimeMap)
where
    W: WeatherService + 'static,
    T: ChatTransport + 'static,
{
    let conversation = runtime.conversation();
    loop {
        let open = runtime.run_until_idle().await;

        let mut map = runtimes.write().await;
        if open && runtime.has_pending_events() {
            continue;
        }
        map.remove(&conversation);
        // The receiver goes away with the lock still held
        drop(runtime);
        drop(map);
        break;
    }

    tracing::debug!(conversation = %conversation, "Cleared conversation session");
}
