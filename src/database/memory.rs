//! In-memory repository
//!
//! Same contract as the Postgres store, kept in process memory behind one
//! async mutex. Ids come from per-table counters advanced under that lock, so
//! they stay gapless and unique under concurrent writers. Used by tests and
//! for running the bot without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use crate::database::Repository;
use crate::models::*;
use crate::utils::errors::{TicketDeskError, Result};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    admins: Vec<Admin>,
    tickets: Vec<Ticket>,
    comments: Vec<Comment>,
    next_user_id: i64,
    next_admin_id: i64,
    next_ticket_id: i64,
    next_comment_id: i64,
}

impl Tables {
    fn next(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn user_by_identity(&self, telegram_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.telegram_id == telegram_id)
    }

    fn insert_user(&mut self, telegram_id: i64, group: &str) -> User {
        let user = User {
            id: Self::next(&mut self.next_user_id),
            telegram_id,
            user_group: group.to_string(),
            created_at: Utc::now(),
        };
        self.users.push(user.clone());
        user
    }

    fn ticket_mut(&mut self, ticket_id: i64) -> Result<&mut Ticket> {
        self.tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| TicketDeskError::ticket_not_found(ticket_id))
    }

    /// Like `ticket_mut`, but closed tickets are read-only
    fn open_ticket_mut(&mut self, ticket_id: i64) -> Result<&mut Ticket> {
        let ticket = self.ticket_mut(ticket_id)?;
        if !ticket.is_open() {
            return Err(TicketDeskError::TicketClosed(ticket_id));
        }
        Ok(ticket)
    }

    fn add_comment(&mut self, ticket_id: i64, author: CommentAuthor, content: &str) -> Result<Comment> {
        let now = Utc::now();
        let ticket = self.open_ticket_mut(ticket_id)?;
        if author.is_staff() {
            ticket.updated_at = now;
        }

        let comment = Comment {
            id: Self::next(&mut self.next_comment_id),
            ticket_id,
            author,
            content: content.to_string(),
            created_at: now,
        };
        self.comments.push(comment.clone());
        Ok(comment)
    }
}

#[derive(Debug)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    default_group: String,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::with_default_group(DEFAULT_USER_GROUP)
    }

    pub fn with_default_group(group: &str) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            default_group: group.to_string(),
        }
    }

    /// Provision an admin; chat flows never create admins
    pub async fn add_admin(&self, request: CreateAdminRequest) -> Admin {
        let mut tables = self.tables.lock().await;
        let admin = Admin {
            id: Tables::next(&mut tables.next_admin_id),
            telegram_id: request.telegram_id,
            username: request.username,
            full_name: request.full_name,
            position: request.position,
        };
        tables.admins.push(admin.clone());
        admin
    }

    pub async fn ticket_count(&self) -> usize {
        self.tables.lock().await.tickets.len()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }

    /// Every stored comment, across tickets
    pub async fn all_comments(&self) -> Vec<Comment> {
        self.tables.lock().await.comments.clone()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(&self, telegram_id: i64) -> Result<User> {
        let mut tables = self.tables.lock().await;
        if tables.user_by_identity(telegram_id).is_some() {
            return Err(TicketDeskError::Conflict(format!(
                "user with telegram id {} already exists",
                telegram_id
            )));
        }
        Ok(tables.insert_user(telegram_id, &self.default_group))
    }

    async fn get_or_create_user(&self, telegram_id: i64) -> Result<User> {
        let mut tables = self.tables.lock().await;
        if let Some(user) = tables.user_by_identity(telegram_id) {
            return Ok(user.clone());
        }
        Ok(tables.insert_user(telegram_id, &self.default_group))
    }

    async fn find_user_by_identity(&self, telegram_id: i64) -> Result<User> {
        let tables = self.tables.lock().await;
        tables
            .user_by_identity(telegram_id)
            .cloned()
            .ok_or_else(|| TicketDeskError::user_not_found(telegram_id))
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<User> {
        let tables = self.tables.lock().await;
        tables
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| TicketDeskError::user_not_found(user_id))
    }

    async fn create_ticket(&self, author_telegram_id: i64, request: CreateTicketRequest) -> Result<Ticket> {
        let mut tables = self.tables.lock().await;
        let author_id = match tables.user_by_identity(author_telegram_id) {
            Some(user) => user.id,
            None => tables.insert_user(author_telegram_id, &self.default_group).id,
        };

        let now = Utc::now();
        let ticket = Ticket {
            id: Tables::next(&mut tables.next_ticket_id),
            title: request.title,
            description: request.description,
            status: TicketStatus::Open,
            priority: request.priority,
            created_by: author_id,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };
        tables.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn get_ticket(&self, ticket_id: i64) -> Result<Ticket> {
        let tables = self.tables.lock().await;
        tables
            .tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .cloned()
            .ok_or_else(|| TicketDeskError::ticket_not_found(ticket_id))
    }

    async fn list_tickets_by_user(&self, telegram_id: i64) -> Result<Vec<Ticket>> {
        let tables = self.tables.lock().await;
        let Some(user) = tables.user_by_identity(telegram_id) else {
            return Ok(Vec::new());
        };
        // Insertion order is creation order
        Ok(tables
            .tickets
            .iter()
            .filter(|t| t.created_by == user.id)
            .cloned()
            .collect())
    }

    async fn list_all_tickets(&self) -> Result<Vec<Ticket>> {
        let tables = self.tables.lock().await;
        let mut tickets = tables.tickets.clone();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tickets)
    }

    async fn close_ticket(&self, ticket_id: i64) -> Result<CloseOutcome> {
        let mut tables = self.tables.lock().await;
        let ticket = tables.ticket_mut(ticket_id)?;
        if ticket.status == TicketStatus::Closed {
            return Ok(CloseOutcome::AlreadyClosed);
        }
        ticket.status = TicketStatus::Closed;
        ticket.updated_at = Utc::now();
        Ok(CloseOutcome::Closed)
    }

    async fn assign_ticket(&self, ticket_id: i64, admin_id: i64) -> Result<Ticket> {
        let mut tables = self.tables.lock().await;
        let ticket = tables.open_ticket_mut(ticket_id)?;
        ticket.assigned_to = Some(admin_id);
        ticket.updated_at = Utc::now();
        Ok(ticket.clone())
    }

    async fn add_user_comment(&self, ticket_id: i64, user_id: i64, content: &str) -> Result<Comment> {
        let mut tables = self.tables.lock().await;
        tables.add_comment(ticket_id, CommentAuthor::User(user_id), content)
    }

    async fn add_admin_comment(&self, ticket_id: i64, admin_id: i64, content: &str) -> Result<Comment> {
        let mut tables = self.tables.lock().await;
        tables.add_comment(ticket_id, CommentAuthor::Admin(admin_id), content)
    }

    async fn list_comments(&self, ticket_id: i64) -> Result<Vec<Comment>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.ticket_id == ticket_id)
            .cloned()
            .collect())
    }

    async fn list_admins(&self) -> Result<Vec<Admin>> {
        Ok(self.tables.lock().await.admins.clone())
    }

    async fn find_admin_by_identity(&self, telegram_id: i64) -> Result<Admin> {
        let tables = self.tables.lock().await;
        tables
            .admins
            .iter()
            .find(|a| a.telegram_id == telegram_id)
            .cloned()
            .ok_or_else(|| TicketDeskError::admin_not_found(telegram_id))
    }

    async fn find_admin_by_id(&self, admin_id: i64) -> Result<Admin> {
        let tables = self.tables.lock().await;
        tables
            .admins
            .iter()
            .find(|a| a.id == admin_id)
            .cloned()
            .ok_or_else(|| TicketDeskError::admin_not_found(admin_id))
    }
}
