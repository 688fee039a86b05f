//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Join first and last name the way Telegram shows them
pub fn full_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name {
        Some(last) if !last.is_empty() => format!("{} {}", first_name, last),
        _ => first_name.to_string(),
    }
}

/// Render an optional username as a mention
pub fn format_username(username: Option<&str>) -> String {
    match username {
        Some(name) if !name.is_empty() => format!("@{}", name),
        _ => "not set".to_string(),
    }
}

/// Normalize free text typed by a user: trims surrounding whitespace
pub fn normalize_input(text: &str) -> String {
    text.trim().to_string()
}
