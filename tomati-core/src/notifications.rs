//! In-app notification delivery.
//!
//! Thin service over the notification store plus typed helpers for the
//! events the marketplace emits. Copy is French, matching the shipped
//! product.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::ports::notifications::NotificationRepository;
use crate::error::Result;
use tomati_model::notification::{
    NewNotification, Notification, NotificationKind,
};

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, new: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::now_v7(),
            user_id: new.user_id,
            title: new.title,
            message: new.message,
            kind: new.kind,
            related_id: new.related_id,
            is_read: false,
            created_at: Utc::now(),
        };

        self.repo.create(&notification).await?;
        Ok(notification)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Notification>> {
        self.repo.list_for_user(user_id).await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        self.repo.unread_count(user_id).await
    }

    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        self.repo.mark_read(id, user_id).await
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        self.repo.mark_all_read(user_id).await
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        self.repo.delete(id, user_id).await
    }

    /// Tell a seller their listing crossed the like threshold.
    pub async fn notify_product_promoted(
        &self,
        owner_id: Uuid,
        product_title: &str,
        product_id: Uuid,
    ) -> Result<()> {
        self.create(NewNotification {
            user_id: owner_id,
            title: "🎉 Produit promu !".to_string(),
            message: format!(
                "Félicitations ! Votre produit \"{product_title}\" a été \
                 automatiquement promu après avoir reçu 3 j'aimes !"
            ),
            kind: NotificationKind::ProductUpdate,
            related_id: Some(product_id),
        })
        .await
        .map(drop)
    }

    /// Tell a user they received a chat message.
    pub async fn notify_new_message(
        &self,
        receiver_id: Uuid,
        sender_name: &str,
        conversation_id: Uuid,
    ) -> Result<()> {
        self.create(NewNotification {
            user_id: receiver_id,
            title: "💬 Nouveau message".to_string(),
            message: format!("{sender_name} vous a envoyé un message"),
            kind: NotificationKind::Message,
            related_id: Some(conversation_id),
        })
        .await
        .map(drop)
    }
}
