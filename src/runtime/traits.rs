//! Trait abstractions for runtime I/O
//!
//! The chat platform sits behind `ChatTransport` so the runtime can be driven
//! by mock implementations in tests.

use crate::state_machine::{Choice, ConversationKey};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure to deliver an outbound message
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Outbound side of the chat platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a plain text reply
    async fn send_text(&self, conversation: ConversationKey, text: &str)
        -> Result<(), TransportError>;

    /// Send a reply with a row of labelled choice buttons
    async fn send_choices(
        &self,
        conversation: ConversationKey,
        text: &str,
        choices: &[Choice],
    ) -> Result<(), TransportError>;
}

// ============================================================================
// Arc implementation for shared transports
// ============================================================================

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send_text(
        &self,
        conversation: ConversationKey,
        text: &str,
    ) -> Result<(), TransportError> {
        (**self).send_text(conversation, text).await
    }

    async fn send_choices(
        &self,
        conversation: ConversationKey,
        text: &str,
        choices: &[Choice],
    ) -> Result<(), TransportError> {
        (**self).send_choices(conversation, text, choices).await
    }
}
