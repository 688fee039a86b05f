//! Postgres pool and schema setup for the ticket store
//!
//! The bot opens one pool at startup, checks it answers, and applies the
//! embedded ticket schema before any update is dispatched.

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;
use crate::config::DatabaseConfig;
use crate::utils::errors::TicketDeskError;

pub type DatabasePool = Pool<Postgres>;

/// Idle connections are recycled after this long
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
/// Connections are replaced after this long regardless of use
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Pool sizing derived from `[database]` settings
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl From<&DatabaseConfig> for PoolConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            acquire_timeout: Duration::from_secs(config.acquire_timeout_seconds),
            idle_timeout: Some(IDLE_TIMEOUT),
            max_lifetime: Some(MAX_LIFETIME),
        }
    }
}

/// Open the ticket store pool and make sure it answers a query
pub async fn create_pool(config: &PoolConfig) -> Result<DatabasePool, TicketDeskError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Ticket store pool ready"
    );
    Ok(pool)
}

/// Apply the embedded schema (users, admins, tickets, comments)
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), TicketDeskError> {
    let migrator = sqlx::migrate!("./migrations");
    info!(migrations = migrator.iter().count(), "Applying ticket store schema");
    migrator.run(pool).await?;
    Ok(())
}
