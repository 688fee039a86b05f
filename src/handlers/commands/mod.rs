//! Command handlers module
//!
//! This module contains handlers for bot commands like /start, /help, etc.

pub mod help;
pub mod profile;

use teloxide::utils::command::BotCommands;
use tracing::debug;
use crate::handlers::Workflow;
use crate::messenger::InboundEvent;
use crate::services::view;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "TicketDesk commands:")]
pub enum Command {
    #[command(description = "Start the bot and show the menu")]
    Start,
    #[command(description = "Show the help menu")]
    Help,
    #[command(description = "Show your profile")]
    GetMe,
    #[command(description = "Open a new ticket")]
    NewTicket,
    #[command(description = "List your tickets")]
    MyTickets,
    #[command(description = "List all tickets (admin only)")]
    AllTickets,
    #[command(description = "Cancel the current step")]
    Cancel,
}

impl Command {
    /// Resolve a bare command name such as `help`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::parse(&format!("/{}", name), "").ok()
    }
}

impl Workflow {
    /// Main command dispatcher
    pub(crate) async fn handle_command(&self, event: &InboundEvent, name: &str) -> Result<()> {
        let Some(command) = Command::from_name(name) else {
            debug!(chat_id = event.chat_id, command = name, "Unknown command");
            return self.messenger.send_text(event.chat_id, view::UNKNOWN_COMMAND_TEXT).await;
        };

        match command {
            Command::Start | Command::Help => self.show_help(event).await,
            Command::GetMe => self.show_profile(event).await,
            Command::NewTicket => self.begin_creation(event.chat_id).await,
            Command::MyTickets => self.show_own_tickets(event).await,
            Command::AllTickets => self.show_all_tickets(event).await,
            Command::Cancel => self.cancel_flow(event).await,
        }
    }
}
