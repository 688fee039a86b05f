//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{TicketDeskError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;
    validate_tickets_config(&settings.tickets)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(TicketDeskError::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(TicketDeskError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(TicketDeskError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(TicketDeskError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TicketDeskError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(TicketDeskError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate ticket workflow configuration
fn validate_tickets_config(config: &super::TicketsConfig) -> Result<()> {
    if config.default_priority.trim().is_empty() {
        return Err(TicketDeskError::Config(
            "Default ticket priority cannot be empty".to_string()
        ));
    }

    if config.default_user_group.trim().is_empty() {
        return Err(TicketDeskError::Config(
            "Default user group cannot be empty".to_string()
        ));
    }

    if config.max_title_length == 0
        || config.max_description_length == 0
        || config.max_comment_length == 0
    {
        return Err(TicketDeskError::Config(
            "Text length limits must be greater than 0".to_string()
        ));
    }

    Ok(())
}
