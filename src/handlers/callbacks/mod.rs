//! Callback handlers module
//!
//! Routes inline button presses, identified by their action token

pub mod actions;

pub use actions::Action;

use tracing::{debug, warn};
use crate::handlers::Workflow;
use crate::messenger::InboundEvent;
use crate::services::view;
use crate::utils::errors::Result;

impl Workflow {
    /// Main action dispatcher
    pub(crate) async fn handle_action(&self, event: &InboundEvent, token: &str, source_message_id: Option<i32>) -> Result<()> {
        let action: Action = token.parse().map_err(|e| {
            warn!(chat_id = event.chat_id, token = token, "Malformed action token");
            e
        })?;
        debug!(chat_id = event.chat_id, action = %action, ticket_id = ?action.ticket_id(), "Routing action");

        match action {
            Action::CreateTicket => self.begin_creation(event.chat_id).await,
            Action::ViewTickets => self.show_own_tickets(event).await,
            Action::ViewAllTickets => self.show_all_tickets(event).await,
            Action::GetInfo => self.show_profile(event).await,
            Action::ConfirmTicket => self.confirm_creation(event).await,
            Action::CancelTicket => self.cancel_creation(event).await,
            Action::ViewTicket(ticket_id) => {
                self.show_ticket(event.chat_id, event.sender.identity, ticket_id).await
            }
            Action::CloseTicket(ticket_id) => self.close_ticket(event, ticket_id, source_message_id).await,
            Action::AddComment(ticket_id) => self.begin_comment(event, ticket_id, view::COMMENT_PROMPT).await,
            Action::ReplyTicket(ticket_id) => self.begin_comment(event, ticket_id, view::REPLY_PROMPT).await,
            Action::AssignTicket(ticket_id) => self.show_assignment_menu(event, ticket_id).await,
            Action::AssignTo { ticket_id, admin_id } => self.assign_ticket(event, ticket_id, admin_id).await,
        }
    }
}
