//! State management module
//!
//! This module handles per-chat conversation state

pub mod context;
pub mod storage;

// Re-export commonly used state components
pub use context::{ConversationContext, ConversationPhase, TicketDraft};
pub use storage::{ChatGuard, StateStorage};
