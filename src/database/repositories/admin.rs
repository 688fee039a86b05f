//! Admin repository implementation

use sqlx::PgPool;
use crate::models::admin::{Admin, CreateAdminRequest};
use crate::utils::errors::TicketDeskError;

const ADMIN_COLUMNS: &str = "admin_id AS id, telegram_id, username, full_name, position";

#[derive(Clone, Debug)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Provision an admin (used by fixtures and seeding, never by chat flows)
    pub async fn create(&self, request: CreateAdminRequest) -> Result<Admin, TicketDeskError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            r#"
            INSERT INTO admin_users (telegram_id, username, full_name, position)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ADMIN_COLUMNS
        ))
        .bind(request.telegram_id)
        .bind(request.username)
        .bind(request.full_name)
        .bind(request.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Admin>, TicketDeskError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admin_users WHERE admin_id = $1",
            ADMIN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<Admin>, TicketDeskError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admin_users WHERE telegram_id = $1",
            ADMIN_COLUMNS
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// List all admins in id order
    pub async fn list(&self) -> Result<Vec<Admin>, TicketDeskError> {
        let admins = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admin_users ORDER BY admin_id ASC",
            ADMIN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }
}
