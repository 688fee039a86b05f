//! User repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::user::User;
use crate::utils::errors::TicketDeskError;

const USER_COLUMNS: &str = "user_id AS id, telegram_id, user_group, created_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
    default_group: String,
}

impl UserRepository {
    pub fn new(pool: PgPool, default_group: impl Into<String>) -> Self {
        Self { pool, default_group: default_group.into() }
    }

    /// Create a new user; fails with `Conflict` if the identity is taken
    pub async fn create(&self, telegram_id: i64) -> Result<User, TicketDeskError> {
        let result = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO regular_users (telegram_id, user_group, created_at)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(telegram_id)
        .bind(&self.default_group)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
                Err(TicketDeskError::Conflict(format!(
                    "user with telegram id {} already exists",
                    telegram_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Return the user for an identity, inserting it if missing.
    ///
    /// The insert is `ON CONFLICT DO NOTHING`, so concurrent callers for the
    /// same identity converge on one row.
    pub async fn get_or_create(&self, telegram_id: i64) -> Result<User, TicketDeskError> {
        if let Some(user) = self.find_by_telegram_id(telegram_id).await? {
            return Ok(user);
        }

        let inserted = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO regular_users (telegram_id, user_group, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (telegram_id) DO NOTHING
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(telegram_id)
        .bind(&self.default_group)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(user) => {
                tracing::info!(user_id = user.id, telegram_id = telegram_id, "New user registered");
                Ok(user)
            }
            // Lost the race to a concurrent insert
            None => self
                .find_by_telegram_id(telegram_id)
                .await?
                .ok_or_else(|| TicketDeskError::user_not_found(telegram_id)),
        }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, TicketDeskError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM regular_users WHERE user_id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by Telegram ID
    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, TicketDeskError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM regular_users WHERE telegram_id = $1",
            USER_COLUMNS
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, TicketDeskError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM regular_users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
