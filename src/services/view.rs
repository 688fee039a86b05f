//! Ticket views and prompts
//!
//! Pure functions that turn tickets, comments and admins into text plus
//! button rows. Nothing here touches the store or the transport.

use chrono::{DateTime, Utc};
use crate::handlers::callbacks::Action;
use crate::messenger::{ActionButton, Keyboard};
use crate::models::{Admin, Comment, CommentAuthor, Ticket, User};
use crate::utils::helpers::{format_timestamp, format_username, full_name, truncate_text};

pub const HELP_TEXT: &str = "Welcome to the help menu. Choose an option:";
pub const UNRECOGNIZED_TEXT: &str = "I don't understand that. Use /help to see what I can do.";
pub const UNKNOWN_COMMAND_TEXT: &str = "Unknown command, try /help.";
pub const TITLE_PROMPT: &str = "Please enter the ticket title:";
pub const DESCRIPTION_PROMPT: &str = "Please enter the ticket description:";
pub const COMMENT_PROMPT: &str = "Please enter your comment:";
pub const REPLY_PROMPT: &str = "Please enter your reply:";
pub const CREATION_CANCELLED: &str = "Ticket creation cancelled.";
pub const CANCELLED: &str = "Cancelled.";
pub const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";
pub const CONFIRM_HINT: &str = "Please confirm or cancel the ticket first.";
pub const TICKET_IS_CLOSED: &str = "This ticket is closed and can no longer be changed.";
pub const ASSIGN_PROMPT: &str = "Choose the admin to assign this ticket to:";
pub const OWN_TICKETS_HEADER: &str = "Your tickets:";
pub const ALL_TICKETS_HEADER: &str = "All tickets:";
pub const NO_TICKETS: &str = "You don't have any tickets yet.";
pub const NO_TICKETS_AT_ALL: &str = "There are no tickets yet.";
pub const NO_ADMINS: &str = "There are no admins to assign this ticket to.";
pub const TICKET_CLOSED_MARK: &str = "Ticket closed";

/// Longest title shown on a list button
const LIST_TITLE_MAX: usize = 40;

/// A comment together with its resolved staff author, if any
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub comment: Comment,
    pub admin: Option<Admin>,
}

/// Fields shown by the profile card
#[derive(Debug, Clone)]
pub struct ProfileCard<'a> {
    pub user: &'a User,
    pub first_name: &'a str,
    pub last_name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub message_time: DateTime<Utc>,
}

pub fn help_menu(is_admin: bool) -> Keyboard {
    let mut rows = vec![
        vec![
            ActionButton::new("Create ticket", Action::CreateTicket),
            ActionButton::new("My tickets", Action::ViewTickets),
        ],
        vec![ActionButton::new("My info", Action::GetInfo)],
    ];
    if is_admin {
        rows.push(vec![ActionButton::new("All tickets", Action::ViewAllTickets)]);
    }
    rows
}

pub fn ticket_summary(ticket: &Ticket) -> String {
    format!(
        "Ticket #{}\nTitle: {}\nDescription: {}\nStatus: {}\nPriority: {}\nCreated: {}",
        ticket.id,
        ticket.title,
        ticket.description,
        ticket.status,
        ticket.priority,
        format_timestamp(ticket.created_at)
    )
}

fn render_comment(entry: &TranscriptEntry) -> String {
    let comment = &entry.comment;
    match (&comment.author, &entry.admin) {
        (CommentAuthor::Admin(_), Some(admin)) => format!(
            "[Staff] {} (comment #{}):\n{}\n\nRegards,\n{}\n{}\nTime: {}",
            admin.full_name,
            comment.id,
            comment.content,
            admin.full_name,
            admin.position,
            format_timestamp(comment.created_at)
        ),
        (CommentAuthor::Admin(_), None) => format!(
            "[Staff] (unknown) (comment #{}):\n{}\nTime: {}",
            comment.id,
            comment.content,
            format_timestamp(comment.created_at)
        ),
        (CommentAuthor::User(_), _) => format!(
            "User comment (#{}):\n{}\nTime: {}",
            comment.id,
            comment.content,
            format_timestamp(comment.created_at)
        ),
    }
}

/// Summary followed by the full comment transcript in stored order
pub fn render_ticket(ticket: &Ticket, transcript: &[TranscriptEntry]) -> String {
    let mut text = ticket_summary(ticket);
    for entry in transcript {
        text.push_str("\n\n");
        text.push_str(&render_comment(entry));
    }
    text
}

/// "Back to list" points admins at the full list
pub fn back_to_list(is_admin: bool) -> Keyboard {
    let target = if is_admin { Action::ViewAllTickets } else { Action::ViewTickets };
    vec![vec![ActionButton::new("Back to list", target)]]
}

/// Menu under a rendered ticket, by status and viewer role
pub fn ticket_actions(ticket: &Ticket, is_admin: bool) -> Keyboard {
    if !ticket.is_open() {
        return back_to_list(is_admin);
    }

    let mut rows = if is_admin {
        vec![
            vec![
                ActionButton::new("Reply", Action::ReplyTicket(ticket.id)),
                ActionButton::new("Close ticket", Action::CloseTicket(ticket.id)),
            ],
            vec![ActionButton::new("Assign", Action::AssignTicket(ticket.id))],
        ]
    } else {
        vec![vec![
            ActionButton::new("Add comment", Action::AddComment(ticket.id)),
            ActionButton::new("Close ticket", Action::CloseTicket(ticket.id)),
        ]]
    };
    rows.extend(back_to_list(is_admin));
    rows
}

/// Text of a ticket view after it was closed in place
pub fn closed_view(rendered: &str) -> String {
    format!("{}\n\n{}", rendered, TICKET_CLOSED_MARK)
}

/// One button per ticket, in the given order
pub fn ticket_list(tickets: &[Ticket]) -> Keyboard {
    tickets
        .iter()
        .map(|ticket| {
            vec![ActionButton::new(
                format!("#{}: {} ({})", ticket.id, truncate_text(&ticket.title, LIST_TITLE_MAX), ticket.status),
                Action::ViewTicket(ticket.id),
            )]
        })
        .collect()
}

pub fn confirmation_prompt(title: &str, description: &str) -> (String, Keyboard) {
    let text = format!(
        "Please confirm the ticket:\nTitle: {}\nDescription: {}\n\nCreate this ticket?",
        title, description
    );
    let keyboard = vec![vec![
        ActionButton::new("Confirm", Action::ConfirmTicket),
        ActionButton::new("Cancel", Action::CancelTicket),
    ]];
    (text, keyboard)
}

pub fn assignment_menu(ticket_id: i64, admins: &[Admin]) -> Keyboard {
    admins
        .iter()
        .map(|admin| {
            vec![ActionButton::new(
                admin.full_name.clone(),
                Action::AssignTo { ticket_id, admin_id: admin.id },
            )]
        })
        .collect()
}

pub fn profile_card(card: &ProfileCard<'_>) -> String {
    format!(
        "Your info:\nUser ID: {}\nFull name: {}\nUsername: {}\nTelegram ID: {}\nMessage time: {}\nUser group: {}\nRegistered: {}",
        card.user.id,
        full_name(card.first_name, card.last_name),
        format_username(card.username),
        card.user.telegram_id,
        format_timestamp(card.message_time),
        card.user.user_group,
        format_timestamp(card.user.created_at)
    )
}

/// Broadcast to admins when a ticket is created
pub fn new_ticket_notice(ticket: &Ticket) -> (String, Keyboard) {
    let text = format!(
        "New ticket created:\nTicket ID: {}\nTitle: {}\nDescription: {}",
        ticket.id, ticket.title, ticket.description
    );
    let keyboard = vec![vec![ActionButton::new("Assign ticket", Action::AssignTicket(ticket.id))]];
    (text, keyboard)
}

pub fn staff_reply_notice(ticket_id: i64, content: &str) -> String {
    format!("Ticket #{} has a new reply from staff:\n{}", ticket_id, content)
}

pub fn user_comment_notice(ticket_id: i64, content: &str) -> String {
    format!("Ticket #{} has a new comment:\n{}", ticket_id, content)
}

pub fn assignment_notice(ticket: &Ticket) -> String {
    format!(
        "A ticket was assigned to you:\nTicket ID: {}\nTitle: {}\nDescription: {}",
        ticket.id, ticket.title, ticket.description
    )
}

pub fn ticket_created(ticket_id: i64) -> String {
    format!("Ticket created. Ticket ID: {}", ticket_id)
}

pub fn assigned_confirmation(ticket_id: i64, admin: &Admin) -> String {
    format!("Ticket #{} assigned to {}.", ticket_id, admin.full_name)
}

pub fn text_too_long(field: &str, max: usize) -> String {
    format!("The {} is too long (at most {} characters). Please try again:", field, max)
}
