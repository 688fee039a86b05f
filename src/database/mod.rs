//! Database module
//!
//! Postgres connection handling, per-table repositories, and the
//! [`Repository`] contract the workflow is written against.

pub mod connection;
pub mod repositories;
pub mod service;
pub mod store;
pub mod memory;

// Re-export commonly used database components
pub use connection::{DatabasePool, PoolConfig, create_pool, run_migrations};
pub use repositories::{UserRepository, AdminRepository, TicketRepository, CommentRepository};
pub use service::DatabaseService;
pub use store::Repository;
pub use memory::MemoryRepository;
