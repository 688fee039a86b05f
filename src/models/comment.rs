//! Comment model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::utils::errors::TicketDeskError;

/// Who wrote a comment. Exactly one author kind per comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum CommentAuthor {
    User(i64),
    Admin(i64),
}

impl CommentAuthor {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            CommentAuthor::User(id) => Some(*id),
            CommentAuthor::Admin(_) => None,
        }
    }

    pub fn admin_id(&self) -> Option<i64> {
        match self {
            CommentAuthor::Admin(id) => Some(*id),
            CommentAuthor::User(_) => None,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, CommentAuthor::Admin(_))
    }
}

/// Append-only message on a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub ticket_id: i64,
    pub author: CommentAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Row shape of `ticket_comments`
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub ticket_id: i64,
    pub user_id: Option<i64>,
    pub admin_id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = TicketDeskError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let author = match (row.user_id, row.admin_id) {
            (Some(user_id), None) => CommentAuthor::User(user_id),
            (None, Some(admin_id)) => CommentAuthor::Admin(admin_id),
            _ => {
                return Err(TicketDeskError::Integrity(format!(
                    "comment {} must have exactly one author",
                    row.id
                )))
            }
        };

        Ok(Comment {
            id: row.id,
            ticket_id: row.ticket_id,
            author,
            content: row.content,
            created_at: row.created_at,
        })
    }
}
