//! Telegram implementation of [`Messenger`]

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, UserId},
};
use tracing::debug;
use crate::utils::errors::Result;
use super::{Keyboard, Messenger};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn markup(actions: &Keyboard) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(actions.iter().map(|row| {
            row.iter()
                .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.token.clone()))
                .collect::<Vec<_>>()
        }))
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn send_text_with_actions(&self, chat_id: i64, text: &str, actions: &Keyboard) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_markup(Self::markup(actions))
            .await?;
        Ok(())
    }

    async fn send_image_with_caption(&self, chat_id: i64, image_ref: &str, caption: &str) -> Result<()> {
        self.bot
            .send_photo(ChatId(chat_id), InputFile::file_id(image_ref.to_owned()))
            .caption(caption)
            .await?;
        Ok(())
    }

    async fn edit_message(&self, chat_id: i64, message_id: i32, text: &str, actions: &Keyboard) -> Result<()> {
        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id), text)
            .reply_markup(Self::markup(actions))
            .await?;
        Ok(())
    }

    async fn profile_photo(&self, identity: i64) -> Result<Option<String>> {
        let photos = self
            .bot
            .get_user_profile_photos(UserId(identity as u64))
            .limit(1)
            .await?;

        let file_id = photos
            .photos
            .first()
            .and_then(|sizes| sizes.first())
            .map(|size| size.file.id.to_string());
        debug!(identity = identity, has_photo = file_id.is_some(), "Fetched profile photo");
        Ok(file_id)
    }

    async fn acknowledge_action(&self, callback_id: &str) -> Result<()> {
        self.bot.answer_callback_query(callback_id.to_owned()).await?;
        Ok(())
    }
}
