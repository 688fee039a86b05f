//! Profile card (/getme and the "My info" button)

use tracing::warn;
use crate::handlers::Workflow;
use crate::messenger::InboundEvent;
use crate::services::{view, ProfileCard};
use crate::utils::errors::Result;

impl Workflow {
    pub(crate) async fn show_profile(&self, event: &InboundEvent) -> Result<()> {
        let sender = &event.sender;
        let user = self.repository.get_or_create_user(sender.identity).await?;

        let card = view::profile_card(&ProfileCard {
            user: &user,
            first_name: &sender.first_name,
            last_name: sender.last_name.as_deref(),
            username: sender.username.as_deref(),
            message_time: event.received_at,
        });

        // A failed photo lookup only costs the picture
        let photo = match self.messenger.profile_photo(sender.identity).await {
            Ok(photo) => photo,
            Err(e) => {
                warn!(identity = sender.identity, error = %e, "Profile photo lookup failed");
                None
            }
        };

        match photo {
            Some(image_ref) => {
                self.messenger
                    .send_image_with_caption(event.chat_id, &image_ref, &card)
                    .await
            }
            None => self.messenger.send_text(event.chat_id, &card).await,
        }
    }
}
