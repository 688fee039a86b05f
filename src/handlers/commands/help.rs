//! Help menu and flow cancellation

use crate::handlers::Workflow;
use crate::messenger::InboundEvent;
use crate::services::view;
use crate::utils::errors::Result;

impl Workflow {
    /// Handle /start, /help
    pub(crate) async fn show_help(&self, event: &InboundEvent) -> Result<()> {
        let is_admin = self.repository.is_admin(event.sender.identity).await?;
        self.messenger
            .send_text_with_actions(event.chat_id, view::HELP_TEXT, &view::help_menu(is_admin))
            .await
    }

    /// Handle /cancel: drop whatever flow the chat is in
    pub(crate) async fn cancel_flow(&self, event: &InboundEvent) -> Result<()> {
        let pending = self.state.clear(event.chat_id).await;
        let text = match pending {
            Some(context) if !context.is_idle() => view::CANCELLED,
            _ => view::NOTHING_TO_CANCEL,
        };
        self.messenger.send_text(event.chat_id, text).await
    }
}
