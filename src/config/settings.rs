//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub tickets: TicketsConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    #[serde(default)]
    pub json: bool,
}

/// Ticket workflow configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TicketsConfig {
    /// Priority label stamped on every new ticket
    pub default_priority: String,
    /// Group assigned to lazily created users
    pub default_user_group: String,
    pub max_title_length: usize,
    pub max_description_length: usize,
    pub max_comment_length: usize,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout() -> u64 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: "logs".to_string(),
            json: false,
        }
    }
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            default_priority: "normal".to_string(),
            default_user_group: "Default".to_string(),
            max_title_length: 200,
            max_description_length: 4000,
            max_comment_length: 4000,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` (optional) and `TICKETDESK__*` environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("TICKETDESK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Load settings from an explicit file, still honouring environment overrides
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("TICKETDESK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::TicketDeskError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                webhook_url: None,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/ticketdesk".to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                acquire_timeout_seconds: default_acquire_timeout(),
            },
            logging: LoggingConfig::default(),
            tickets: TicketsConfig::default(),
        }
    }
}
