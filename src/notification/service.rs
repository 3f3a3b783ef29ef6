use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::{Notification, NotificationKind};
use crate::shared::AppError;
use crate::store::{keys, load_collection, save_typed, RecordStore};
use crate::user::User;

pub struct NotificationService {
    store: Arc<dyn RecordStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, content))]
    pub async fn add_notification(
        &self,
        user_id: &str,
        kind: NotificationKind,
        content: impl Into<String>,
        reference_id: Option<&str>,
    ) -> Result<Notification, AppError> {
        let notification = Notification::new(
            user_id.to_string(),
            kind,
            content.into(),
            reference_id.map(str::to_string),
        );

        let mut notifications = self.load().await?;
        notifications.push(notification.clone());
        self.save(&notifications).await?;

        debug!(notification_id = %notification.id, "Notification added");
        Ok(notification)
    }

    /// Notifications addressed to `user_id`, oldest first
    pub async fn notifications_for(&self, user_id: &str) -> Result<Vec<Notification>, AppError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect())
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<usize, AppError> {
        Ok(self
            .notifications_for(user_id)
            .await?
            .iter()
            .filter(|n| !n.read)
            .count())
    }

    /// Marks one notification read. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub async fn mark_as_read(&self, notification_id: &str) -> Result<(), AppError> {
        let mut notifications = self.load().await?;
        for notification in notifications.iter_mut().filter(|n| n.id == notification_id) {
            notification.read = true;
        }
        self.save(&notifications).await
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn mark_all_as_read(&self, actor: &User) -> Result<(), AppError> {
        let mut notifications = self.load().await?;
        for notification in notifications.iter_mut().filter(|n| n.user_id == actor.id) {
            notification.read = true;
        }
        self.save(&notifications).await
    }

    /// Drops the actor's notifications, leaving everybody else's
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn clear_notifications(&self, actor: &User) -> Result<(), AppError> {
        let mut notifications = self.load().await?;
        notifications.retain(|n| n.user_id != actor.id);
        self.save(&notifications).await
    }

    async fn load(&self) -> Result<Vec<Notification>, AppError> {
        Ok(load_collection(self.store.as_ref(), keys::NOTIFICATIONS).await?)
    }

    async fn save(&self, notifications: &[Notification]) -> Result<(), AppError> {
        Ok(save_typed(self.store.as_ref(), keys::NOTIFICATIONS, notifications).await?)
    }
}
