//! Message handlers module
//!
//! Free text is only meaningful inside a flow. Outside one it gets a pointer
//! to /help and never reaches ticket logic.

use tracing::debug;
use crate::handlers::Workflow;
use crate::messenger::InboundEvent;
use crate::services::view;
use crate::state::ConversationPhase;
use crate::utils::errors::Result;
use crate::utils::helpers::normalize_input;

impl Workflow {
    /// Handle incoming text messages
    pub(crate) async fn handle_text(&self, event: &InboundEvent, raw: &str) -> Result<()> {
        let text = normalize_input(raw);
        let Some(mut context) = self.state.load(event.chat_id).await else {
            return self.messenger.send_text(event.chat_id, view::UNRECOGNIZED_TEXT).await;
        };
        debug!(chat_id = event.chat_id, phase = %context.phase, "Handling text in flow");

        match context.phase {
            ConversationPhase::None => self.messenger.send_text(event.chat_id, view::UNRECOGNIZED_TEXT).await,
            ConversationPhase::AwaitingTitle => {
                if let Some(reason) = length_problem("title", &text, self.settings.max_title_length) {
                    return self.messenger.send_text(event.chat_id, &reason).await;
                }
                context.draft.title = Some(text);
                context.advance(ConversationPhase::AwaitingDescription)?;
                self.state.save(context).await;
                self.messenger.send_text(event.chat_id, view::DESCRIPTION_PROMPT).await
            }
            ConversationPhase::AwaitingDescription => {
                if let Some(reason) = length_problem("description", &text, self.settings.max_description_length) {
                    return self.messenger.send_text(event.chat_id, &reason).await;
                }
                context.draft.description = Some(text);
                context.advance(ConversationPhase::ConfirmPending)?;
                let (prompt, keyboard) = match context.draft.complete() {
                    Some((title, description)) => view::confirmation_prompt(title, description),
                    None => return self.begin_creation(event.chat_id).await,
                };
                self.state.save(context).await;
                self.messenger.send_text_with_actions(event.chat_id, &prompt, &keyboard).await
            }
            ConversationPhase::ConfirmPending => {
                let Some((title, description)) = context.draft.complete() else {
                    return self.begin_creation(event.chat_id).await;
                };
                let (prompt, keyboard) = view::confirmation_prompt(title, description);
                self.messenger.send_text(event.chat_id, view::CONFIRM_HINT).await?;
                self.messenger.send_text_with_actions(event.chat_id, &prompt, &keyboard).await
            }
            ConversationPhase::AwaitingComment => {
                if let Some(reason) = length_problem("comment", &text, self.settings.max_comment_length) {
                    return self.messenger.send_text(event.chat_id, &reason).await;
                }
                self.submit_comment(event, context, &text).await
            }
        }
    }
}

/// Prompt to retype when the text is empty or over the limit
fn length_problem(field: &str, text: &str, max: usize) -> Option<String> {
    if text.is_empty() {
        return Some(format!("The {} cannot be empty. Please try again:", field));
    }
    (text.chars().count() > max).then(|| view::text_too_long(field, max))
}
