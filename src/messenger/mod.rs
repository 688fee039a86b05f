//! Chat transport boundary
//!
//! The workflow never talks to Telegram directly. Outbound content goes
//! through [`Messenger`]; inbound updates arrive as [`InboundEvent`]s built by
//! the dispatcher in `main`.

pub mod telegram;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::utils::errors::Result;

pub use telegram::TelegramMessenger;

/// One button: what the user sees and the token sent back when pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub label: String,
    pub token: String,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, token: impl ToString) -> Self {
        Self {
            label: label.into(),
            token: token.to_string(),
        }
    }
}

/// Ordered rows of buttons
pub type Keyboard = Vec<Vec<ActionButton>>;

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    async fn send_text_with_actions(&self, chat_id: i64, text: &str, actions: &Keyboard) -> Result<()>;

    /// `image_ref` is a transport-side file reference
    async fn send_image_with_caption(&self, chat_id: i64, image_ref: &str, caption: &str) -> Result<()>;

    async fn edit_message(&self, chat_id: i64, message_id: i32, text: &str, actions: &Keyboard) -> Result<()>;

    /// Reference to the identity's current profile photo, if it has one
    async fn profile_photo(&self, identity: i64) -> Result<Option<String>>;

    /// Clear the pending indicator on a pressed button
    async fn acknowledge_action(&self, callback_id: &str) -> Result<()>;
}

/// Who sent an inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub identity: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Command name without the leading slash or bot suffix
    Command(String),
    FreeText(String),
    Action {
        token: String,
        source_message_id: Option<i32>,
        callback_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub sender: Sender,
    pub received_at: DateTime<Utc>,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EventKind::Command(_) => "command",
            EventKind::FreeText(_) => "text",
            EventKind::Action { .. } => "action",
        }
    }
}
