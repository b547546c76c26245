//! Telegram Bot API client

use super::types::{
    AnswerCallbackQueryRequest, ApiResponse, GetUpdatesRequest, InlineKeyboardButton,
    InlineKeyboardMarkup, SendMessageRequest, Update,
};
use crate::config::TelegramConfig;
use crate::runtime::{ChatTransport, TransportError};
use crate::state_machine::{Choice, ConversationKey};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Maximum message length in UTF-16 code units
pub const MESSAGE_LIMIT: usize = 4096;

/// Headroom on top of the long-poll timeout before the HTTP request gives up
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Request failed: {0}")]
    Http(String),
    #[error("Telegram API error {code:?}: {description}")]
    Api {
        code: Option<i32>,
        description: String,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<TelegramError> for TransportError {
    fn from(err: TelegramError) -> Self {
        TransportError(err.to_string())
    }
}

pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`; never logged
    base_url: String,
    poll_timeout_secs: u32,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.poll_timeout_secs)) + POLL_GRACE)
            .build()
            .map_err(|e| TelegramError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    async fn call<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp, TelegramError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await
            // The URL carries the bot token
            .map_err(|e| TelegramError::Http(e.without_url().to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::Http(e.without_url().to_string()))?;

        let envelope: ApiResponse<Resp> = serde_json::from_str(&body)
            .map_err(|e| TelegramError::InvalidResponse(format!("{method}: {e}")))?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code,
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| TelegramError::InvalidResponse(format!("{method}: missing result")))
    }

    /// Long-poll for updates newer than `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout_secs,
            allowed_updates: vec!["message", "callback_query"],
        };
        self.call("getUpdates", &request).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            reply_markup,
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let request = AnswerCallbackQueryRequest { callback_query_id };
        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_text(
        &self,
        conversation: ConversationKey,
        text: &str,
    ) -> Result<(), TransportError> {
        for chunk in split_message(text, MESSAGE_LIMIT) {
            self.send_message(conversation.chat_id, &chunk, None).await?;
        }
        Ok(())
    }

    async fn send_choices(
        &self,
        conversation: ConversationKey,
        text: &str,
        choices: &[Choice],
    ) -> Result<(), TransportError> {
        let mut chunks = split_message(text, MESSAGE_LIMIT);
        let last = chunks.pop().unwrap_or_default();
        for chunk in chunks {
            self.send_message(conversation.chat_id, &chunk, None).await?;
        }
        self.send_message(conversation.chat_id, &last, Some(keyboard(choices)))
            .await?;
        Ok(())
    }
}

/// One row of buttons, in the given order
pub fn keyboard(choices: &[Choice]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![choices
            .iter()
            .map(|choice| InlineKeyboardButton {
                text: choice.label().to_string(),
                callback_data: choice.callback_data().to_string(),
            })
            .collect()],
    }
}

/// Split text into messages of at most `limit` UTF-16 units, preferring line
/// boundaries. Blank chunks are dropped.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.encode_utf16().count();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        // A single line longer than the limit is cut at character boundaries
        for c in line.chars() {
            if current_len + c.len_utf16() > limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += c.len_utf16();
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks.retain(|chunk| !chunk.trim().is_empty());
    chunks
}
