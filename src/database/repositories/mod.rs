//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod admin;
pub mod ticket;
pub mod comment;

// Re-export repositories
pub use user::UserRepository;
pub use admin::AdminRepository;
pub use ticket::TicketRepository;
pub use comment::CommentRepository;
