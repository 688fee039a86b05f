//! Conversation state storage
//!
//! Process-lifetime map from chat id to [`ConversationContext`]. Nothing here
//! survives a restart. Callers serialize work on one chat with
//! [`StateStorage::lock_chat`]; different chats never contend beyond the
//! short map lookups. A chat's lock entry lives only while someone holds or
//! waits for it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use crate::utils::errors::{TicketDeskError, Result};
use crate::utils::logging::log_state_transition;
use super::context::{ConversationContext, ConversationPhase};

type ChatLocks = Arc<SyncMutex<HashMap<i64, Arc<Mutex<()>>>>>;

fn lock_map(locks: &ChatLocks) -> std::sync::MutexGuard<'_, HashMap<i64, Arc<Mutex<()>>>> {
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Exclusive access to one chat. Dropping it releases the chat and forgets
/// the lock entry when nobody else is waiting on it.
#[derive(Debug)]
pub struct ChatGuard {
    chat_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
    lock: Arc<Mutex<()>>,
    locks: ChatLocks,
}

impl Drop for ChatGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = lock_map(&self.locks);
        // Held by the map and by us only: no waiter cloned it
        let idle = locks
            .get(&self.chat_id)
            .is_some_and(|entry| Arc::ptr_eq(entry, &self.lock) && Arc::strong_count(entry) == 2);
        if idle {
            locks.remove(&self.chat_id);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StateStorage {
    contexts: Arc<Mutex<HashMap<i64, ConversationContext>>>,
    chat_locks: ChatLocks,
}

impl StateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access to one chat for the duration of an event
    pub async fn lock_chat(&self, chat_id: i64) -> ChatGuard {
        let lock = lock_map(&self.chat_locks).entry(chat_id).or_default().clone();
        let guard = lock.clone().lock_owned().await;
        ChatGuard {
            chat_id,
            guard: Some(guard),
            lock,
            locks: self.chat_locks.clone(),
        }
    }

    /// Start a new flow. Any pending flow for the chat is discarded.
    pub async fn begin(&self, chat_id: i64, phase: ConversationPhase) -> ConversationContext {
        let mut contexts = self.contexts.lock().await;
        let context = contexts
            .entry(chat_id)
            .or_insert_with(|| ConversationContext::new(chat_id));
        let previous = context.phase;
        context.begin(phase);

        log_state_transition(chat_id, previous.as_str(), phase.as_str());
        context.clone()
    }

    /// Start a comment flow for `ticket_id`, replacing any pending flow
    pub async fn begin_comment(&self, chat_id: i64, ticket_id: i64) -> ConversationContext {
        let mut contexts = self.contexts.lock().await;
        let context = contexts
            .entry(chat_id)
            .or_insert_with(|| ConversationContext::new(chat_id));
        let previous = context.phase;
        context.begin_comment(ticket_id);

        log_state_transition(chat_id, previous.as_str(), ConversationPhase::AwaitingComment.as_str());
        context.clone()
    }

    /// Advance the chat's flow. Fails if the chat has no flow or the step is not allowed.
    pub async fn advance(&self, chat_id: i64, next: ConversationPhase) -> Result<ConversationContext> {
        let mut contexts = self.contexts.lock().await;
        let context = contexts.get_mut(&chat_id).ok_or_else(|| TicketDeskError::InvalidStateTransition {
            from: ConversationPhase::None.to_string(),
            to: next.to_string(),
        })?;
        let previous = context.phase;
        context.advance(next)?;

        log_state_transition(chat_id, previous.as_str(), next.as_str());
        Ok(context.clone())
    }

    /// Current phase; `None` when the chat has no context
    pub async fn get(&self, chat_id: i64) -> ConversationPhase {
        self.contexts
            .lock()
            .await
            .get(&chat_id)
            .map(|c| c.phase)
            .unwrap_or_default()
    }

    pub async fn load(&self, chat_id: i64) -> Option<ConversationContext> {
        self.contexts.lock().await.get(&chat_id).cloned()
    }

    /// Store a context as-is; the last write wins
    pub async fn save(&self, context: ConversationContext) {
        debug!(chat_id = context.chat_id, phase = %context.phase, "Saving conversation context");
        self.contexts.lock().await.insert(context.chat_id, context);
    }

    /// Drop the chat's context, returning what was pending
    pub async fn clear(&self, chat_id: i64) -> Option<ConversationContext> {
        let removed = self.contexts.lock().await.remove(&chat_id);
        if let Some(context) = &removed {
            log_state_transition(chat_id, context.phase.as_str(), ConversationPhase::None.as_str());
        }
        removed
    }
}
