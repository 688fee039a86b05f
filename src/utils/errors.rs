//! Error handling for TicketDesk
//!
//! This module defines the main error type used throughout the application
//! and maps every failure onto the small taxonomy the workflow reasons about:
//! missing entities, conflicts, malformed actions and collaborator failures.

use thiserror::Error;

/// Main error type for TicketDesk application
#[derive(Error, Debug)]
pub enum TicketDeskError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Ticket {0} is closed")]
    TicketClosed(i64),

    #[error("Malformed action: {0}")]
    MalformedAction(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Messenger error: {0}")]
    Messenger(String),

    #[error("Stored record is inconsistent: {0}")]
    Integrity(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for TicketDesk operations
pub type Result<T> = std::result::Result<T, TicketDeskError>;

impl TicketDeskError {
    /// Shorthand for a missing ticket
    pub fn ticket_not_found(id: i64) -> Self {
        TicketDeskError::NotFound { entity: "Ticket", id }
    }

    /// Shorthand for a missing user
    pub fn user_not_found(id: i64) -> Self {
        TicketDeskError::NotFound { entity: "User", id }
    }

    /// Shorthand for a missing admin
    pub fn admin_not_found(id: i64) -> Self {
        TicketDeskError::NotFound { entity: "Admin", id }
    }

    /// Whether the error came from the store or the chat transport
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            TicketDeskError::Database(_)
                | TicketDeskError::Migration(_)
                | TicketDeskError::Telegram(_)
                | TicketDeskError::Messenger(_)
                | TicketDeskError::Integrity(_)
                | TicketDeskError::Io(_)
        )
    }

    /// Text shown to the chat participant, if any.
    ///
    /// Collaborator failures return `None`: they are logged and the event is
    /// abandoned without a reply.
    pub fn user_message(&self) -> Option<String> {
        match self {
            TicketDeskError::NotFound { entity, .. } => {
                Some(format!("{} not found. It may have been removed or never existed.", entity))
            }
            TicketDeskError::Conflict(_) => Some("That record already exists.".to_string()),
            TicketDeskError::TicketClosed(_) => {
                Some("This ticket is closed and can no longer be changed.".to_string())
            }
            TicketDeskError::MalformedAction(_) => Some("Unknown option.".to_string()),
            TicketDeskError::PermissionDenied(reason) => Some(format!("Sorry, {}", reason)),
            TicketDeskError::InvalidInput(reason) => Some(reason.clone()),
            TicketDeskError::InvalidStateTransition { .. } => {
                Some("That step is not available right now. Use /help to start over.".to_string())
            }
            _ => None,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TicketDeskError::Database(_) => ErrorSeverity::Critical,
            TicketDeskError::Migration(_) => ErrorSeverity::Critical,
            TicketDeskError::Config(_) => ErrorSeverity::Critical,
            TicketDeskError::Configuration(_) => ErrorSeverity::Critical,
            TicketDeskError::Integrity(_) => ErrorSeverity::Critical,
            TicketDeskError::PermissionDenied(_) => ErrorSeverity::Warning,
            TicketDeskError::MalformedAction(_) => ErrorSeverity::Warning,
            TicketDeskError::Conflict(_) => ErrorSeverity::Warning,
            TicketDeskError::NotFound { .. } => ErrorSeverity::Info,
            TicketDeskError::TicketClosed(_) => ErrorSeverity::Info,
            TicketDeskError::InvalidInput(_) => ErrorSeverity::Info,
            TicketDeskError::InvalidStateTransition { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
