//! Action tokens carried by inline buttons
//!
//! Tokens look like `verb_noun` optionally followed by `_<int>` arguments,
//! e.g. `view_ticket_42` or `assign_to_42_7`. Parsing splits on `_`, takes the
//! leading non-numeric components as the action name and requires the exact
//! argument count for that name.

use std::fmt;
use std::str::FromStr;
use crate::utils::errors::TicketDeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateTicket,
    ViewTickets,
    ViewAllTickets,
    GetInfo,
    ConfirmTicket,
    CancelTicket,
    ViewTicket(i64),
    CloseTicket(i64),
    AddComment(i64),
    ReplyTicket(i64),
    AssignTicket(i64),
    AssignTo { ticket_id: i64, admin_id: i64 },
}

impl Action {
    /// Ticket the action refers to, if any
    pub fn ticket_id(&self) -> Option<i64> {
        match self {
            Action::ViewTicket(id)
            | Action::CloseTicket(id)
            | Action::AddComment(id)
            | Action::ReplyTicket(id)
            | Action::AssignTicket(id) => Some(*id),
            Action::AssignTo { ticket_id, .. } => Some(*ticket_id),
            _ => None,
        }
    }
}

fn parse_argument(token: &str, part: &str) -> Result<i64, TicketDeskError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TicketDeskError::MalformedAction(token.to_string()));
    }
    part.parse::<i64>()
        .map_err(|_| TicketDeskError::MalformedAction(token.to_string()))
}

impl FromStr for Action {
    type Err = TicketDeskError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = token.split('_').collect();
        let split = parts
            .iter()
            .position(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(parts.len());
        let name = parts[..split].join("_");
        let args = parts[split..]
            .iter()
            .map(|part| parse_argument(token, part))
            .collect::<Result<Vec<i64>, _>>()?;

        let action = match (name.as_str(), args.as_slice()) {
            ("create_ticket", []) => Action::CreateTicket,
            ("view_tickets", []) => Action::ViewTickets,
            ("view_all_tickets", []) => Action::ViewAllTickets,
            ("get_info", []) => Action::GetInfo,
            ("confirm_ticket", []) => Action::ConfirmTicket,
            ("cancel_ticket", []) => Action::CancelTicket,
            ("view_ticket", [id]) => Action::ViewTicket(*id),
            ("close_ticket", [id]) => Action::CloseTicket(*id),
            ("add_comment", [id]) => Action::AddComment(*id),
            ("reply_ticket", [id]) => Action::ReplyTicket(*id),
            ("assign_ticket", [id]) => Action::AssignTicket(*id),
            ("assign_to", [ticket_id, admin_id]) => Action::AssignTo {
                ticket_id: *ticket_id,
                admin_id: *admin_id,
            },
            _ => return Err(TicketDeskError::MalformedAction(token.to_string())),
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CreateTicket => f.write_str("create_ticket"),
            Action::ViewTickets => f.write_str("view_tickets"),
            Action::ViewAllTickets => f.write_str("view_all_tickets"),
            Action::GetInfo => f.write_str("get_info"),
            Action::ConfirmTicket => f.write_str("confirm_ticket"),
            Action::CancelTicket => f.write_str("cancel_ticket"),
            Action::ViewTicket(id) => write!(f, "view_ticket_{}", id),
            Action::CloseTicket(id) => write!(f, "close_ticket_{}", id),
            Action::AddComment(id) => write!(f, "add_comment_{}", id),
            Action::ReplyTicket(id) => write!(f, "reply_ticket_{}", id),
            Action::AssignTicket(id) => write!(f, "assign_ticket_{}", id),
            Action::AssignTo { ticket_id, admin_id } => write!(f, "assign_to_{}_{}", ticket_id, admin_id),
        }
    }
}
