//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the TicketDesk application.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{TicketDeskError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "ticketdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_json = config.json.then(|| fmt::layer().json().with_writer(std::io::stdout));
    let stdout_plain = (!config.json).then(|| fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(stdout_json)
        .with(stdout_plain)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| TicketDeskError::Config(format!("Failed to install logger: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log ticket lifecycle actions with structured data
pub fn log_ticket_action(ticket_id: i64, action: &str, actor: i64, details: Option<&str>) {
    info!(
        ticket_id = ticket_id,
        action = action,
        actor = actor,
        details = details,
        "Ticket action performed"
    );
}

/// Log a failed send to a secondary recipient
pub fn log_notification_failure(recipient: i64, context: &str, error: &str) {
    warn!(
        recipient = recipient,
        context = context,
        error = error,
        "Notification could not be delivered"
    );
}

/// Log conversation phase changes
pub fn log_state_transition(chat_id: i64, from: &str, to: &str) {
    debug!(
        chat_id = chat_id,
        from = from,
        to = to,
        "Conversation phase changed"
    );
}
