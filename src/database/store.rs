//! Ticket store contract
//!
//! The workflow only talks to persistence through [`Repository`]. Postgres
//! ([`crate::database::DatabaseService`]) and memory
//! ([`crate::database::MemoryRepository`]) back it with the same semantics:
//! store-assigned ids that are positive and increasing, comments bound to an
//! existing ticket, and an open -> closed transition that happens once.

use async_trait::async_trait;
use crate::models::{Admin, CloseOutcome, Comment, CreateTicketRequest, Ticket, User};
use crate::utils::errors::Result;

#[async_trait]
pub trait Repository: Send + Sync {
    /// Create a user for an identity. `Conflict` if one already exists.
    async fn create_user(&self, telegram_id: i64) -> Result<User>;

    /// Idempotent lookup-or-insert; never yields two rows for one identity.
    async fn get_or_create_user(&self, telegram_id: i64) -> Result<User>;

    async fn find_user_by_identity(&self, telegram_id: i64) -> Result<User>;

    async fn find_user_by_id(&self, user_id: i64) -> Result<User>;

    /// Resolve (or lazily create) the author, then insert an open ticket.
    async fn create_ticket(&self, author_telegram_id: i64, request: CreateTicketRequest) -> Result<Ticket>;

    async fn get_ticket(&self, ticket_id: i64) -> Result<Ticket>;

    /// Tickets created by an identity, in creation order.
    async fn list_tickets_by_user(&self, telegram_id: i64) -> Result<Vec<Ticket>>;

    /// Every ticket, newest first.
    async fn list_all_tickets(&self) -> Result<Vec<Ticket>>;

    /// `NotFound` if the ticket does not exist; closing twice is `AlreadyClosed`.
    async fn close_ticket(&self, ticket_id: i64) -> Result<CloseOutcome>;

    /// `TicketClosed` once the ticket is closed. Does not check that
    /// `admin_id` exists; that is the caller's job.
    async fn assign_ticket(&self, ticket_id: i64, admin_id: i64) -> Result<Ticket>;

    /// `TicketClosed` once the ticket is closed, checked atomically with the insert.
    async fn add_user_comment(&self, ticket_id: i64, user_id: i64, content: &str) -> Result<Comment>;

    /// Same closed-ticket rule as user comments. Also bumps the ticket's `updated_at`.
    async fn add_admin_comment(&self, ticket_id: i64, admin_id: i64, content: &str) -> Result<Comment>;

    /// Comments on a ticket, oldest first.
    async fn list_comments(&self, ticket_id: i64) -> Result<Vec<Comment>>;

    async fn list_admins(&self) -> Result<Vec<Admin>>;

    async fn find_admin_by_identity(&self, telegram_id: i64) -> Result<Admin>;

    async fn find_admin_by_id(&self, admin_id: i64) -> Result<Admin>;

    /// Role check used before composing menus and routing comments.
    async fn is_admin(&self, telegram_id: i64) -> Result<bool> {
        match self.find_admin_by_identity(telegram_id).await {
            Ok(_) => Ok(true),
            Err(crate::utils::errors::TicketDeskError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
