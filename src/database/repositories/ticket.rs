//! Ticket repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::ticket::{Ticket, CreateTicketRequest, CloseOutcome};
use crate::utils::errors::TicketDeskError;

const TICKET_COLUMNS: &str = "ticket_id AS id, title, description, status, priority, created_by, assigned_to, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an open ticket authored by `created_by` (internal user id)
    pub async fn create(&self, created_by: i64, request: CreateTicketRequest) -> Result<Ticket, TicketDeskError> {
        let now = Utc::now();
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets (title, description, status, priority, created_by, created_at, updated_at)
            VALUES ($1, $2, 'open', $3, $4, $5, $5)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.priority)
        .bind(created_by)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Ticket>, TicketDeskError> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {} FROM tickets WHERE ticket_id = $1",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Tickets created by the user behind a Telegram identity, in creation order
    pub async fn list_by_telegram_id(&self, telegram_id: i64) -> Result<Vec<Ticket>, TicketDeskError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT t.ticket_id AS id, t.title, t.description, t.status, t.priority,
                   t.created_by, t.assigned_to, t.created_at, t.updated_at
            FROM tickets t
            JOIN regular_users u ON t.created_by = u.user_id
            WHERE u.telegram_id = $1
            ORDER BY t.created_at ASC, t.ticket_id ASC
            "#
        )
        .bind(telegram_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    /// All tickets, newest first
    pub async fn list_all(&self) -> Result<Vec<Ticket>, TicketDeskError> {
        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {} FROM tickets ORDER BY created_at DESC, ticket_id DESC",
            TICKET_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    /// Close an open ticket. Only an open row is updated, so a second close
    /// is reported as `AlreadyClosed` instead of touching the row again.
    pub async fn close(&self, id: i64) -> Result<CloseOutcome, TicketDeskError> {
        let result = sqlx::query(
            "UPDATE tickets SET status = 'closed', updated_at = $2 WHERE ticket_id = $1 AND status = 'open'"
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(CloseOutcome::Closed);
        }

        match self.find_by_id(id).await? {
            Some(_) => Ok(CloseOutcome::AlreadyClosed),
            None => Err(TicketDeskError::ticket_not_found(id)),
        }
    }

    /// Set the assignee of an open ticket. The admin id is not checked
    /// against `admin_users`.
    pub async fn assign(&self, id: i64, admin_id: i64) -> Result<Ticket, TicketDeskError> {
        let updated = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets SET assigned_to = $2, updated_at = $3
            WHERE ticket_id = $1 AND status = 'open'
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(id)
        .bind(admin_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ticket) = updated {
            return Ok(ticket);
        }
        match self.find_by_id(id).await? {
            Some(_) => Err(TicketDeskError::TicketClosed(id)),
            None => Err(TicketDeskError::ticket_not_found(id)),
        }
    }

    pub async fn count_by_status(&self, status: &str) -> Result<i64, TicketDeskError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
