//! Admin model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Support staff member. Provisioned out-of-band; the bot only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub full_name: String,
    pub position: String,
}

/// Admin row to seed, used by fixtures and provisioning scripts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub full_name: String,
    pub position: String,
}
