//! Ticket comment repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::comment::{Comment, CommentAuthor, CommentRow};
use crate::models::ticket::TicketStatus;
use crate::utils::errors::TicketDeskError;

const COMMENT_COLUMNS: &str = "comment_id AS id, ticket_id, user_id, admin_id, content, created_at";

#[derive(Clone, Debug)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a comment to an open ticket. The ticket row stays locked until
    /// commit, so a concurrent close cannot slip in between the status check
    /// and the insert. Staff comments also bump the ticket's `updated_at`.
    pub async fn add(&self, ticket_id: i64, author: CommentAuthor, content: &str) -> Result<Comment, TicketDeskError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let status: Option<(String,)> = sqlx::query_as("SELECT status FROM tickets WHERE ticket_id = $1 FOR UPDATE")
            .bind(ticket_id)
            .fetch_optional(&mut *tx)
            .await?;
        match status {
            None => return Err(TicketDeskError::ticket_not_found(ticket_id)),
            Some((status,)) if status != TicketStatus::Open.as_str() => {
                return Err(TicketDeskError::TicketClosed(ticket_id))
            }
            Some(_) => {}
        }

        let row = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            INSERT INTO ticket_comments (ticket_id, user_id, admin_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        ))
        .bind(ticket_id)
        .bind(author.user_id())
        .bind(author.admin_id())
        .bind(content)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        if author.is_staff() {
            sqlx::query("UPDATE tickets SET updated_at = $2 WHERE ticket_id = $1")
                .bind(ticket_id)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Comment::try_from(row)
    }

    /// Comments on a ticket, oldest first
    pub async fn list_for_ticket(&self, ticket_id: i64) -> Result<Vec<Comment>, TicketDeskError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {} FROM ticket_comments WHERE ticket_id = $1 ORDER BY created_at ASC, comment_id ASC",
            COMMENT_COLUMNS
        ))
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }
}
