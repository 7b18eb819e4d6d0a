use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use tomati_model::notification::Notification;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<()>;

    /// All notifications for a user, newest first.
    async fn list_for_user(&self, user_id: Uuid)
    -> Result<Vec<Notification>>;

    async fn unread_count(&self, user_id: Uuid) -> Result<i64>;

    /// Returns `false` when no matching row belongs to the user.
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Returns the number of rows flipped to read.
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}
