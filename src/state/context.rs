//! Conversation context
//!
//! Tracks where one chat is within a multi-message flow: the current phase,
//! the partially filled ticket draft and the ticket a pending comment targets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::utils::errors::{TicketDeskError, Result};

/// Step a chat participant is at within a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversationPhase {
    #[default]
    None,
    AwaitingTitle,
    AwaitingDescription,
    ConfirmPending,
    AwaitingComment,
}

impl ConversationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationPhase::None => "none",
            ConversationPhase::AwaitingTitle => "awaiting_title",
            ConversationPhase::AwaitingDescription => "awaiting_description",
            ConversationPhase::ConfirmPending => "confirm_pending",
            ConversationPhase::AwaitingComment => "awaiting_comment",
        }
    }

    /// Phases reachable from this one by text input alone
    fn can_advance_to(&self, next: ConversationPhase) -> bool {
        matches!(
            (self, next),
            (ConversationPhase::AwaitingTitle, ConversationPhase::AwaitingDescription)
                | (ConversationPhase::AwaitingDescription, ConversationPhase::ConfirmPending)
        )
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket fields collected before confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TicketDraft {
    /// Title and description, once both are present
    pub fn complete(&self) -> Option<(&str, &str)> {
        match (&self.title, &self.description) {
            (Some(title), Some(description)) => Some((title.as_str(), description.as_str())),
            _ => None,
        }
    }
}

/// Per-chat conversation context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub chat_id: i64,
    pub phase: ConversationPhase,
    pub draft: TicketDraft,
    pub pending_ticket_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            phase: ConversationPhase::None,
            draft: TicketDraft::default(),
            pending_ticket_id: None,
            updated_at: Utc::now(),
        }
    }

    /// Start a flow from scratch, dropping whatever was pending
    pub fn begin(&mut self, phase: ConversationPhase) {
        self.phase = phase;
        self.draft = TicketDraft::default();
        self.pending_ticket_id = None;
        self.updated_at = Utc::now();
    }

    /// Start a comment flow targeting `ticket_id`
    pub fn begin_comment(&mut self, ticket_id: i64) {
        self.begin(ConversationPhase::AwaitingComment);
        self.pending_ticket_id = Some(ticket_id);
    }

    /// Move forward within the creation flow
    pub fn advance(&mut self, next: ConversationPhase) -> Result<()> {
        if !self.phase.can_advance_to(next) {
            return Err(TicketDeskError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }

        self.phase = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ConversationPhase::None
    }
}
