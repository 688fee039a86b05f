//! TicketDesk Telegram Bot
//!
//! A support-ticket desk run over Telegram chat. Users open tickets through a
//! short guided dialog, staff triage, assign and reply, and both sides follow
//! the conversation on the ticket itself.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod messenger;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{TicketDeskError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, MemoryRepository, Repository};
pub use handlers::Workflow;
pub use messenger::{Messenger, TelegramMessenger};
pub use state::StateStorage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
