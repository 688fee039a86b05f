//! Database service layer
//!
//! This module provides a high-level interface to database operations and
//! implements the [`Repository`] contract on top of the Postgres repositories.

use async_trait::async_trait;
use crate::database::{DatabasePool, Repository, UserRepository, AdminRepository, TicketRepository, CommentRepository};
use crate::models::*;
use crate::utils::errors::{TicketDeskError, Result};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub admins: AdminRepository,
    pub tickets: TicketRepository,
    pub comments: CommentRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool, default_user_group: &str) -> Self {
        Self {
            users: UserRepository::new(pool.clone(), default_user_group),
            admins: AdminRepository::new(pool.clone()),
            tickets: TicketRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
        }
    }

    /// Get system statistics
    pub async fn get_system_stats(&self) -> Result<serde_json::Value> {
        let users = self.users.count().await?;
        let open = self.tickets.count_by_status(TicketStatus::Open.as_str()).await?;
        let closed = self.tickets.count_by_status(TicketStatus::Closed.as_str()).await?;
        let admins = self.admins.list().await?.len();

        Ok(serde_json::json!({
            "users": { "total": users },
            "admins": { "total": admins },
            "tickets": { "open": open, "closed": closed }
        }))
    }
}

#[async_trait]
impl Repository for DatabaseService {
    async fn create_user(&self, telegram_id: i64) -> Result<User> {
        self.users.create(telegram_id).await
    }

    async fn get_or_create_user(&self, telegram_id: i64) -> Result<User> {
        self.users.get_or_create(telegram_id).await
    }

    async fn find_user_by_identity(&self, telegram_id: i64) -> Result<User> {
        self.users
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or_else(|| TicketDeskError::user_not_found(telegram_id))
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| TicketDeskError::user_not_found(user_id))
    }

    async fn create_ticket(&self, author_telegram_id: i64, request: CreateTicketRequest) -> Result<Ticket> {
        let author = self.users.get_or_create(author_telegram_id).await?;
        self.tickets.create(author.id, request).await
    }

    async fn get_ticket(&self, ticket_id: i64) -> Result<Ticket> {
        self.tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| TicketDeskError::ticket_not_found(ticket_id))
    }

    async fn list_tickets_by_user(&self, telegram_id: i64) -> Result<Vec<Ticket>> {
        self.tickets.list_by_telegram_id(telegram_id).await
    }

    async fn list_all_tickets(&self) -> Result<Vec<Ticket>> {
        self.tickets.list_all().await
    }

    async fn close_ticket(&self, ticket_id: i64) -> Result<CloseOutcome> {
        self.tickets.close(ticket_id).await
    }

    async fn assign_ticket(&self, ticket_id: i64, admin_id: i64) -> Result<Ticket> {
        self.tickets.assign(ticket_id, admin_id).await
    }

    async fn add_user_comment(&self, ticket_id: i64, user_id: i64, content: &str) -> Result<Comment> {
        self.comments.add(ticket_id, CommentAuthor::User(user_id), content).await
    }

    async fn add_admin_comment(&self, ticket_id: i64, admin_id: i64, content: &str) -> Result<Comment> {
        self.comments.add(ticket_id, CommentAuthor::Admin(admin_id), content).await
    }

    async fn list_comments(&self, ticket_id: i64) -> Result<Vec<Comment>> {
        self.comments.list_for_ticket(ticket_id).await
    }

    async fn list_admins(&self) -> Result<Vec<Admin>> {
        self.admins.list().await
    }

    async fn find_admin_by_identity(&self, telegram_id: i64) -> Result<Admin> {
        self.admins
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or_else(|| TicketDeskError::admin_not_found(telegram_id))
    }

    async fn find_admin_by_id(&self, admin_id: i64) -> Result<Admin> {
        self.admins
            .find_by_id(admin_id)
            .await?
            .ok_or_else(|| TicketDeskError::admin_not_found(admin_id))
    }
}
