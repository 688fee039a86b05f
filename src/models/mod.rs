//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod admin;
pub mod ticket;
pub mod comment;

// Re-export commonly used models
pub use user::{User, DEFAULT_USER_GROUP};
pub use admin::{Admin, CreateAdminRequest};
pub use ticket::{Ticket, TicketStatus, CreateTicketRequest, CloseOutcome};
pub use comment::{Comment, CommentAuthor, CommentRow};
