use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::models::ChatMessage;
use crate::shared::AppError;
use crate::store::{keys, load_collection, save_typed, RecordStore};
use crate::user::User;

/// The global chat room
pub struct ChatService {
    store: Arc<dyn RecordStore>,
}

impl ChatService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Posts a trimmed message. Blank content is dropped and yields `None`.
    #[instrument(skip(self, actor, content), fields(sender_id = %actor.id))]
    pub async fn send_message(
        &self,
        actor: &User,
        content: &str,
    ) -> Result<Option<ChatMessage>, AppError> {
        let content = content.trim();
        if content.is_empty() {
            debug!("Ignoring blank chat message");
            return Ok(None);
        }

        let message = ChatMessage::new(actor.id.clone(), content.to_string());
        let mut messages = self.list_messages().await?;
        messages.push(message.clone());
        save_typed(self.store.as_ref(), keys::CHAT_MESSAGES, &messages).await?;

        debug!(message_id = %message.id, "Chat message sent");
        Ok(Some(message))
    }

    pub async fn list_messages(&self) -> Result<Vec<ChatMessage>, AppError> {
        Ok(load_collection(self.store.as_ref(), keys::CHAT_MESSAGES).await?)
    }

    #[instrument(skip(self))]
    pub async fn clear_chat(&self) -> Result<(), AppError> {
        save_typed(self.store.as_ref(), keys::CHAT_MESSAGES, &Vec::<ChatMessage>::new()).await?;
        info!("Chat cleared");
        Ok(())
    }

    /// Unread messages written by someone other than the actor
    pub async fn unread_count(&self, actor: &User) -> Result<usize, AppError> {
        Ok(self
            .list_messages()
            .await?
            .iter()
            .filter(|m| !m.read && m.sender_id != actor.id)
            .count())
    }
}
