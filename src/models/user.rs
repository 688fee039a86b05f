//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Group assigned to users created on first contact
pub const DEFAULT_USER_GROUP: &str = "Default";

/// A chat participant who opens tickets.
///
/// Created lazily on first interaction and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub user_group: String,
    pub created_at: DateTime<Utc>,
}
