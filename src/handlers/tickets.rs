//! Ticket operations shared by commands, buttons and free text

use std::collections::HashMap;
use tracing::{info, warn};
use crate::handlers::Workflow;
use crate::messenger::InboundEvent;
use crate::models::{Admin, CloseOutcome, CommentAuthor, CreateTicketRequest, Ticket};
use crate::services::{view, TranscriptEntry};
use crate::state::{ConversationContext, ConversationPhase};
use crate::utils::errors::{Result, TicketDeskError};
use crate::utils::logging::{log_notification_failure, log_ticket_action};

impl Workflow {
    /// Admin record for the identity, if it is one
    async fn admin_for(&self, identity: i64) -> Result<Option<Admin>> {
        match self.repository.find_admin_by_identity(identity).await {
            Ok(admin) => Ok(Some(admin)),
            Err(TicketDeskError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn require_admin(&self, identity: i64, reason: &str) -> Result<Admin> {
        self.admin_for(identity)
            .await?
            .ok_or_else(|| TicketDeskError::PermissionDenied(reason.to_string()))
    }

    /// Non-admins may only touch tickets they created
    async fn ensure_participant(&self, ticket: &Ticket, identity: i64, is_admin: bool) -> Result<()> {
        if is_admin {
            return Ok(());
        }
        match self.repository.find_user_by_identity(identity).await {
            Ok(user) if user.id == ticket.created_by => Ok(()),
            Ok(_) | Err(TicketDeskError::NotFound { .. }) => Err(TicketDeskError::PermissionDenied(
                "you can only access your own tickets.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Comments of a ticket with staff authors resolved. A staff author that
    /// can no longer be found renders as unknown.
    pub(crate) async fn load_transcript(&self, ticket_id: i64) -> Result<Vec<TranscriptEntry>> {
        let comments = self.repository.list_comments(ticket_id).await?;
        let mut admins: HashMap<i64, Option<Admin>> = HashMap::new();
        let mut transcript = Vec::with_capacity(comments.len());

        for comment in comments {
            let admin = match comment.author {
                CommentAuthor::User(_) => None,
                CommentAuthor::Admin(admin_id) => {
                    if !admins.contains_key(&admin_id) {
                        let found = match self.repository.find_admin_by_id(admin_id).await {
                            Ok(admin) => Some(admin),
                            Err(TicketDeskError::NotFound { .. }) => {
                                warn!(ticket_id = ticket_id, admin_id = admin_id, "Comment author is not a known admin");
                                None
                            }
                            Err(e) => return Err(e),
                        };
                        admins.insert(admin_id, found);
                    }
                    admins.get(&admin_id).cloned().flatten()
                }
            };
            transcript.push(TranscriptEntry { comment, admin });
        }
        Ok(transcript)
    }

    async fn render(&self, ticket: &Ticket) -> Result<String> {
        let transcript = self.load_transcript(ticket.id).await?;
        Ok(view::render_ticket(ticket, &transcript))
    }

    /// Send the full ticket view with the menu for the viewer's role
    pub(crate) async fn show_ticket(&self, chat_id: i64, viewer: i64, ticket_id: i64) -> Result<()> {
        let ticket = self.repository.get_ticket(ticket_id).await?;
        let is_admin = self.repository.is_admin(viewer).await?;
        self.ensure_participant(&ticket, viewer, is_admin).await?;

        let text = self.render(&ticket).await?;
        self.messenger
            .send_text_with_actions(chat_id, &text, &view::ticket_actions(&ticket, is_admin))
            .await
    }

    pub(crate) async fn show_own_tickets(&self, event: &InboundEvent) -> Result<()> {
        let tickets = self.repository.list_tickets_by_user(event.sender.identity).await?;
        if tickets.is_empty() {
            return self.messenger.send_text(event.chat_id, view::NO_TICKETS).await;
        }
        self.messenger
            .send_text_with_actions(event.chat_id, view::OWN_TICKETS_HEADER, &view::ticket_list(&tickets))
            .await
    }

    pub(crate) async fn show_all_tickets(&self, event: &InboundEvent) -> Result<()> {
        self.require_admin(event.sender.identity, "only admins can use this command.")
            .await?;

        let tickets = self.repository.list_all_tickets().await?;
        if tickets.is_empty() {
            return self.messenger.send_text(event.chat_id, view::NO_TICKETS_AT_ALL).await;
        }
        self.messenger
            .send_text_with_actions(event.chat_id, view::ALL_TICKETS_HEADER, &view::ticket_list(&tickets))
            .await
    }

    /// Enter the creation flow, replacing any pending flow
    pub(crate) async fn begin_creation(&self, chat_id: i64) -> Result<()> {
        self.state.begin(chat_id, ConversationPhase::AwaitingTitle).await;
        self.messenger.send_text(chat_id, view::TITLE_PROMPT).await
    }

    /// Persist the confirmed draft, tell the admins, show the new ticket
    pub(crate) async fn confirm_creation(&self, event: &InboundEvent) -> Result<()> {
        let context = self
            .state
            .load(event.chat_id)
            .await
            .unwrap_or_else(|| ConversationContext::new(event.chat_id));
        let draft = match (context.phase, context.draft.complete()) {
            (ConversationPhase::ConfirmPending, Some((title, description))) => CreateTicketRequest {
                title: title.to_string(),
                description: description.to_string(),
                priority: self.settings.default_priority.clone(),
            },
            _ => {
                return Err(TicketDeskError::InvalidStateTransition {
                    from: context.phase.to_string(),
                    to: "confirmed".to_string(),
                })
            }
        };

        let ticket = self.repository.create_ticket(event.sender.identity, draft).await?;
        self.state.clear(event.chat_id).await;
        log_ticket_action(ticket.id, "created", event.sender.identity, Some(&ticket.title));

        match self.notifications.broadcast_new_ticket(&ticket).await {
            Ok(report) if !report.failed.is_empty() => warn!(
                ticket_id = ticket.id,
                failed = report.failed.len(),
                attempted = report.attempted(),
                "Some admins missed the new ticket notice"
            ),
            Ok(_) => {}
            Err(e) => warn!(ticket_id = ticket.id, error = %e, "New ticket broadcast failed"),
        }

        self.messenger
            .send_text(event.chat_id, &view::ticket_created(ticket.id))
            .await?;
        self.show_ticket(event.chat_id, event.sender.identity, ticket.id).await
    }

    /// Drop a pending ticket draft without persisting anything
    pub(crate) async fn cancel_creation(&self, event: &InboundEvent) -> Result<()> {
        let phase = self.state.get(event.chat_id).await;
        let in_creation = matches!(
            phase,
            ConversationPhase::AwaitingTitle | ConversationPhase::AwaitingDescription | ConversationPhase::ConfirmPending
        );
        if !in_creation {
            return self.messenger.send_text(event.chat_id, view::NOTHING_TO_CANCEL).await;
        }

        self.state.clear(event.chat_id).await;
        self.messenger.send_text(event.chat_id, view::CREATION_CANCELLED).await
    }

    /// Close a ticket and rewrite the message it was closed from.
    ///
    /// Closing an already closed ticket is treated as success: it is logged
    /// and the closed view is shown again, with no further side effects.
    pub(crate) async fn close_ticket(&self, event: &InboundEvent, ticket_id: i64, source_message_id: Option<i32>) -> Result<()> {
        let actor = event.sender.identity;
        let ticket = self.repository.get_ticket(ticket_id).await?;
        let is_admin = self.repository.is_admin(actor).await?;
        self.ensure_participant(&ticket, actor, is_admin).await?;

        match self.repository.close_ticket(ticket_id).await? {
            CloseOutcome::Closed => log_ticket_action(ticket_id, "closed", actor, None),
            CloseOutcome::AlreadyClosed => {
                warn!(ticket_id = ticket_id, actor = actor, "Ticket was already closed")
            }
        }

        let ticket = self.repository.get_ticket(ticket_id).await?;
        let text = view::closed_view(&self.render(&ticket).await?);
        let keyboard = view::back_to_list(is_admin);
        match source_message_id {
            Some(message_id) => {
                self.messenger
                    .edit_message(event.chat_id, message_id, &text, &keyboard)
                    .await
            }
            None => {
                self.messenger
                    .send_text_with_actions(event.chat_id, &text, &keyboard)
                    .await
            }
        }
    }

    /// Enter the comment flow for an open ticket
    pub(crate) async fn begin_comment(&self, event: &InboundEvent, ticket_id: i64, prompt: &str) -> Result<()> {
        let ticket = self.repository.get_ticket(ticket_id).await?;
        if !ticket.is_open() {
            return self.messenger.send_text(event.chat_id, view::TICKET_IS_CLOSED).await;
        }
        let is_admin = self.repository.is_admin(event.sender.identity).await?;
        self.ensure_participant(&ticket, event.sender.identity, is_admin).await?;

        self.state.begin_comment(event.chat_id, ticket_id).await;
        self.messenger.send_text(event.chat_id, prompt).await
    }

    /// Append the chat's pending comment. Admins write staff comments and
    /// notify the creator; users notify the assignee, if any.
    pub(crate) async fn submit_comment(&self, event: &InboundEvent, context: ConversationContext, content: &str) -> Result<()> {
        let Some(ticket_id) = context.pending_ticket_id else {
            self.state.clear(event.chat_id).await;
            return Err(TicketDeskError::InvalidStateTransition {
                from: context.phase.to_string(),
                to: "commented".to_string(),
            });
        };

        let ticket = self.repository.get_ticket(ticket_id).await?;
        if !ticket.is_open() {
            self.state.clear(event.chat_id).await;
            return self.messenger.send_text(event.chat_id, view::TICKET_IS_CLOSED).await;
        }

        let actor = event.sender.identity;
        let admin = self.admin_for(actor).await?;
        // The store re-checks the status atomically; another chat may have closed it since
        let stored = match &admin {
            Some(admin) => self.repository.add_admin_comment(ticket_id, admin.id, content).await,
            None => {
                let user = self.repository.get_or_create_user(actor).await?;
                self.repository.add_user_comment(ticket_id, user.id, content).await
            }
        };
        let comment = match stored {
            Ok(comment) => comment,
            Err(TicketDeskError::TicketClosed(_)) => {
                self.state.clear(event.chat_id).await;
                warn!(ticket_id = ticket_id, actor = actor, "Ticket closed before the comment was stored");
                return self.messenger.send_text(event.chat_id, view::TICKET_IS_CLOSED).await;
            }
            Err(e) => return Err(e),
        };
        self.state.clear(event.chat_id).await;

        if admin.is_some() {
            log_ticket_action(ticket_id, "staff_comment", actor, Some(&format!("comment {}", comment.id)));
            if let Err(e) = self.notifications.notify_creator_of_reply(&ticket, content).await {
                warn!(ticket_id = ticket_id, error = %e, "Staff reply notification failed");
            }
        } else {
            log_ticket_action(ticket_id, "user_comment", actor, Some(&format!("comment {}", comment.id)));
            if let Err(e) = self.notifications.notify_assignee_of_comment(&ticket, content).await {
                warn!(ticket_id = ticket_id, error = %e, "Comment notification failed");
            }
        }

        self.show_ticket(event.chat_id, actor, ticket_id).await
    }

    /// Offer one button per admin for an open ticket
    pub(crate) async fn show_assignment_menu(&self, event: &InboundEvent, ticket_id: i64) -> Result<()> {
        self.require_admin(event.sender.identity, "only admins can assign tickets.")
            .await?;

        let ticket = self.repository.get_ticket(ticket_id).await?;
        if !ticket.is_open() {
            return self.messenger.send_text(event.chat_id, view::TICKET_IS_CLOSED).await;
        }

        let admins = self.repository.list_admins().await?;
        if admins.is_empty() {
            return self.messenger.send_text(event.chat_id, view::NO_ADMINS).await;
        }
        self.messenger
            .send_text_with_actions(event.chat_id, view::ASSIGN_PROMPT, &view::assignment_menu(ticket_id, &admins))
            .await
    }

    pub(crate) async fn assign_ticket(&self, event: &InboundEvent, ticket_id: i64, admin_id: i64) -> Result<()> {
        let actor = event.sender.identity;
        self.require_admin(actor, "only admins can assign tickets.").await?;

        let assignee = self.repository.find_admin_by_id(admin_id).await?;
        let ticket = self.repository.get_ticket(ticket_id).await?;
        if !ticket.is_open() {
            return self.messenger.send_text(event.chat_id, view::TICKET_IS_CLOSED).await;
        }

        let ticket = match self.repository.assign_ticket(ticket_id, assignee.id).await {
            Ok(ticket) => ticket,
            Err(TicketDeskError::TicketClosed(_)) => {
                warn!(ticket_id = ticket_id, actor = actor, "Ticket closed before it could be assigned");
                return self.messenger.send_text(event.chat_id, view::TICKET_IS_CLOSED).await;
            }
            Err(e) => return Err(e),
        };
        log_ticket_action(ticket_id, "assigned", actor, Some(&assignee.full_name));
        info!(ticket_id = ticket_id, admin_id = assignee.id, "Ticket assigned");

        if let Err(e) = self.notifications.notify_assignment(&ticket, &assignee).await {
            log_notification_failure(assignee.telegram_id, "assignment", &e.to_string());
        }

        self.messenger
            .send_text(event.chat_id, &view::assigned_confirmation(ticket_id, &assignee))
            .await
    }
}
