//! Bot handlers module
//!
//! [`Workflow`] is the ticket state machine. It takes one [`InboundEvent`] at
//! a time per chat and splits the work by event type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard actions
//! - Message handlers for free text inside a flow
//! - Ticket operations shared by all three

pub mod commands;
pub mod callbacks;
pub mod messages;
pub mod tickets;

use std::sync::Arc;
use tracing::{debug, error, warn};
use crate::config::TicketsConfig;
use crate::database::Repository;
use crate::messenger::{EventKind, InboundEvent, Messenger};
use crate::services::NotificationService;
use crate::state::StateStorage;
use crate::utils::errors::{Result, TicketDeskError};

// Re-export commonly used handler types
pub use commands::Command;
pub use callbacks::Action;

#[derive(Clone)]
pub struct Workflow {
    repository: Arc<dyn Repository>,
    messenger: Arc<dyn Messenger>,
    state: StateStorage,
    notifications: NotificationService,
    settings: TicketsConfig,
}

impl Workflow {
    pub fn new(repository: Arc<dyn Repository>, messenger: Arc<dyn Messenger>, settings: TicketsConfig) -> Self {
        let notifications = NotificationService::new(repository.clone(), messenger.clone());
        Self {
            repository,
            messenger,
            state: StateStorage::new(),
            notifications,
            settings,
        }
    }

    /// Conversation state, shared with every clone of this workflow
    pub fn state(&self) -> &StateStorage {
        &self.state
    }

    /// Process one inbound event to completion.
    ///
    /// Events for the same chat are serialized. Button presses are always
    /// acknowledged. On failure the user gets a neutral reply where one
    /// exists and the error is returned to the caller after logging.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<()> {
        let _guard = self.state.lock_chat(event.chat_id).await;
        debug!(
            chat_id = event.chat_id,
            sender = event.sender.identity,
            kind = event.kind_name(),
            "Processing inbound event"
        );

        let outcome = match &event.kind {
            EventKind::Command(name) => self.handle_command(&event, name).await,
            EventKind::FreeText(text) => self.handle_text(&event, text).await,
            EventKind::Action { token, source_message_id, callback_id } => {
                if let Err(e) = self.messenger.acknowledge_action(callback_id).await {
                    warn!(chat_id = event.chat_id, callback_id = %callback_id, error = %e, "Failed to acknowledge action");
                }
                self.handle_action(&event, token, *source_message_id).await
            }
        };

        if let Err(e) = &outcome {
            self.report_failure(&event, e).await;
        }
        outcome
    }

    async fn report_failure(&self, event: &InboundEvent, err: &TicketDeskError) {
        if err.is_collaborator_failure() {
            error!(
                chat_id = event.chat_id,
                sender = event.sender.identity,
                severity = %err.severity(),
                error = %err,
                "Event abandoned"
            );
        } else {
            warn!(chat_id = event.chat_id, sender = event.sender.identity, error = %err, "Event rejected");
        }

        if let Some(message) = err.user_message() {
            if let Err(e) = self.messenger.send_text(event.chat_id, &message).await {
                error!(chat_id = event.chat_id, error = %e, "Failed to send error reply");
            }
        }
    }
}
