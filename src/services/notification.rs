//! Notification fan-out
//!
//! Decides who hears about a ticket change and sends it. Every method here
//! targets a secondary recipient: the caller logs failures and carries on
//! with its own reply.

use std::sync::Arc;
use tracing::{debug, info};
use crate::database::Repository;
use crate::messenger::Messenger;
use crate::models::{Admin, Ticket};
use crate::services::view;
use crate::utils::errors::Result;
use crate::utils::logging::log_notification_failure;

/// Outcome of a best-effort broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Telegram ids that received the notice
    pub delivered: Vec<i64>,
    /// Telegram ids the send failed for, with the error text
    pub failed: Vec<(i64, String)>,
}

impl BroadcastReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn Repository>,
    messenger: Arc<dyn Messenger>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn Repository>, messenger: Arc<dyn Messenger>) -> Self {
        Self { repository, messenger }
    }

    /// Send the new-ticket summary to every admin. A failed send to one
    /// admin does not stop the others.
    pub async fn broadcast_new_ticket(&self, ticket: &Ticket) -> Result<BroadcastReport> {
        let admins = self.repository.list_admins().await?;
        let (text, keyboard) = view::new_ticket_notice(ticket);
        let mut report = BroadcastReport::default();

        for admin in &admins {
            match self.messenger.send_text_with_actions(admin.telegram_id, &text, &keyboard).await {
                Ok(()) => report.delivered.push(admin.telegram_id),
                Err(e) => {
                    log_notification_failure(admin.telegram_id, "new ticket broadcast", &e.to_string());
                    report.failed.push((admin.telegram_id, e.to_string()));
                }
            }
        }

        info!(
            ticket_id = ticket.id,
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "New ticket broadcast finished"
        );
        Ok(report)
    }

    /// Tell the ticket's creator about a staff reply. A failed send is logged
    /// against the creator's Telegram id before it is returned.
    pub async fn notify_creator_of_reply(&self, ticket: &Ticket, content: &str) -> Result<()> {
        let creator = self.repository.find_user_by_id(ticket.created_by).await?;
        self.messenger
            .send_text(creator.telegram_id, &view::staff_reply_notice(ticket.id, content))
            .await
            .inspect_err(|e| log_notification_failure(creator.telegram_id, "staff reply", &e.to_string()))?;
        debug!(ticket_id = ticket.id, recipient = creator.telegram_id, "Creator notified of staff reply");
        Ok(())
    }

    /// Tell the assigned admin about a user comment. `Ok(false)` when the
    /// ticket has no assignee.
    pub async fn notify_assignee_of_comment(&self, ticket: &Ticket, content: &str) -> Result<bool> {
        let Some(admin_id) = ticket.assigned_to else {
            debug!(ticket_id = ticket.id, "Ticket unassigned, no comment notification");
            return Ok(false);
        };

        let admin = self.repository.find_admin_by_id(admin_id).await?;
        self.messenger
            .send_text(admin.telegram_id, &view::user_comment_notice(ticket.id, content))
            .await
            .inspect_err(|e| log_notification_failure(admin.telegram_id, "user comment", &e.to_string()))?;
        debug!(ticket_id = ticket.id, recipient = admin.telegram_id, "Assignee notified of comment");
        Ok(true)
    }

    /// Tell a newly assigned admin about the ticket
    pub async fn notify_assignment(&self, ticket: &Ticket, admin: &Admin) -> Result<()> {
        self.messenger
            .send_text(admin.telegram_id, &view::assignment_notice(ticket))
            .await
    }
}
