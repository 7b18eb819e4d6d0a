//! Buyer/seller messaging.
//!
//! Conversations are scoped to one product and one buyer/seller pair.
//! The service owns participant checks and read-marking; persistence and
//! uniqueness live behind [`ConversationRepository`].

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::database::ports::messaging::ConversationRepository;
use crate::database::ports::products::ProductRepository;
use crate::error::{MarketError, Result};
use crate::notifications::NotificationService;
use tomati_model::message::{
    ChatMessage, Conversation, ConversationSummary, NewConversation,
};
use tomati_model::user::User;

#[derive(Clone)]
pub struct MessagingService {
    conversations: Arc<dyn ConversationRepository>,
    products: Arc<dyn ProductRepository>,
    notifications: NotificationService,
}

impl std::fmt::Debug for MessagingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingService").finish_non_exhaustive()
    }
}

impl MessagingService {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        products: Arc<dyn ProductRepository>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            conversations,
            products,
            notifications,
        }
    }

    /// Open (or return the existing) conversation between the calling
    /// buyer and a product's seller.
    pub async fn open_conversation(
        &self,
        buyer_id: Uuid,
        request: &NewConversation,
    ) -> Result<Conversation> {
        let product = self
            .products
            .get_product(request.product_id)
            .await?
            .ok_or_else(|| {
                MarketError::NotFound("Product not found".to_string())
            })?;

        if product.user_id != request.seller_id {
            return Err(MarketError::Validation(
                "seller does not own this product".to_string(),
            ));
        }
        if buyer_id == request.seller_id {
            return Err(MarketError::Forbidden(
                "cannot open a conversation with yourself".to_string(),
            ));
        }

        self.conversations
            .get_or_create(request.product_id, buyer_id, request.seller_id)
            .await
    }

    /// Append a message; the counterpart gets an in-app notification.
    pub async fn send_message(
        &self,
        conversation_id: Uuid,
        sender: &User,
        content: &str,
    ) -> Result<ChatMessage> {
        let content = content.trim();
        if content.is_empty() {
            return Err(MarketError::Validation(
                "message content is required".to_string(),
            ));
        }

        let conversation = self
            .conversations
            .get(conversation_id)
            .await?
            .ok_or_else(|| {
                MarketError::NotFound("Conversation not found".to_string())
            })?;

        if !conversation.involves(sender.id) {
            return Err(MarketError::Forbidden(
                "not a participant in this conversation".to_string(),
            ));
        }

        let message = self
            .conversations
            .insert_message(conversation_id, sender.id, content)
            .await?;

        let receiver_id = conversation.counterpart(sender.id);
        if let Err(error) = self
            .notifications
            .notify_new_message(
                receiver_id,
                sender.visible_name(),
                conversation_id,
            )
            .await
        {
            warn!(
                %conversation_id,
                %error,
                "failed to notify message recipient"
            );
        }

        Ok(message)
    }

    pub async fn conversations_for(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConversationSummary>> {
        self.conversations.list_summaries(user_id).await
    }

    /// Fetch the full thread for a participant, marking the
    /// counterpart's messages as read.
    pub async fn messages_for(
        &self,
        conversation_id: Uuid,
        reader_id: Uuid,
    ) -> Result<Vec<ChatMessage>> {
        let conversation = self
            .conversations
            .get(conversation_id)
            .await?
            .ok_or_else(|| {
                MarketError::NotFound("Conversation not found".to_string())
            })?;

        if !conversation.involves(reader_id) {
            return Err(MarketError::Forbidden(
                "not a participant in this conversation".to_string(),
            ));
        }

        let messages =
            self.conversations.list_messages(conversation_id).await?;
        self.conversations
            .mark_counterpart_read(conversation_id, reader_id)
            .await?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::database::ports::notifications::NotificationRepository;
    use tomati_model::notification::Notification;
    use tomati_model::product::{Product, ProductFilter, ProductPatch};
    use tomati_model::user::UserRole;

    mock! {
        Conversations {}

        #[async_trait]
        impl ConversationRepository for Conversations {
            async fn get_or_create(
                &self,
                product_id: Uuid,
                buyer_id: Uuid,
                seller_id: Uuid,
            ) -> Result<Conversation>;
            async fn get(&self, id: Uuid) -> Result<Option<Conversation>>;
            async fn list_summaries(
                &self,
                user_id: Uuid,
            ) -> Result<Vec<ConversationSummary>>;
            async fn insert_message(
                &self,
                conversation_id: Uuid,
                sender_id: Uuid,
                content: &str,
            ) -> Result<ChatMessage>;
            async fn list_messages(
                &self,
                conversation_id: Uuid,
            ) -> Result<Vec<ChatMessage>>;
            async fn mark_counterpart_read(
                &self,
                conversation_id: Uuid,
                reader_id: Uuid,
            ) -> Result<u64>;
        }
    }

    mock! {
        Products {}

        #[async_trait]
        impl ProductRepository for Products {
            async fn create_product(&self, product: &Product) -> Result<()>;
            async fn get_product(&self, id: Uuid) -> Result<Option<Product>>;
            async fn list_products(
                &self,
                filter: &ProductFilter,
            ) -> Result<Vec<Product>>;
            async fn list_promoted(&self) -> Result<Vec<Product>>;
            async fn list_by_owner(
                &self,
                owner_id: Uuid,
            ) -> Result<Vec<Product>>;
            async fn update_product(
                &self,
                id: Uuid,
                patch: &ProductPatch,
            ) -> Result<Option<Product>>;
            async fn delete_product(&self, id: Uuid) -> Result<bool>;
            async fn increment_views(&self, id: Uuid) -> Result<()>;
        }
    }

    mock! {
        Notifications {}

        #[async_trait]
        impl NotificationRepository for Notifications {
            async fn create(&self, notification: &Notification) -> Result<()>;
            async fn list_for_user(
                &self,
                user_id: Uuid,
            ) -> Result<Vec<Notification>>;
            async fn unread_count(&self, user_id: Uuid) -> Result<i64>;
            async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
            async fn mark_all_read(&self, user_id: Uuid) -> Result<u64>;
            async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
        }
    }

    fn sample_user(id: Uuid) -> User {
        User {
            id,
            email: "sami@tomati.tn".to_string(),
            display_name: Some("Sami".to_string()),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_conversation(
        id: Uuid,
        buyer_id: Uuid,
        seller_id: Uuid,
    ) -> Conversation {
        Conversation {
            id,
            product_id: Uuid::new_v4(),
            buyer_id,
            seller_id,
            last_message_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn service_with(
        conversations: MockConversations,
        products: MockProducts,
        notifications: MockNotifications,
    ) -> MessagingService {
        MessagingService::new(
            Arc::new(conversations),
            Arc::new(products),
            NotificationService::new(Arc::new(notifications)),
        )
    }

    #[tokio::test]
    async fn send_message_notifies_the_counterpart() {
        let conversation_id = Uuid::new_v4();
        let buyer = Uuid::new_v4();
        let seller = Uuid::new_v4();

        let mut conversations = MockConversations::new();
        conversations.expect_get().returning(move |id| {
            Ok(Some(sample_conversation(id, buyer, seller)))
        });
        conversations.expect_insert_message().returning(
            |conversation_id, sender_id, content| {
                Ok(ChatMessage {
                    id: Uuid::new_v4(),
                    conversation_id,
                    sender_id,
                    content: content.to_string(),
                    is_read: false,
                    created_at: Utc::now(),
                })
            },
        );

        let mut notifications = MockNotifications::new();
        notifications
            .expect_create()
            .withf(move |n| n.user_id == seller)
            .times(1)
            .returning(|_| Ok(()));

        let service = service_with(
            conversations,
            MockProducts::new(),
            notifications,
        );

        let message = service
            .send_message(
                conversation_id,
                &sample_user(buyer),
                "  Toujours disponible ?  ",
            )
            .await
            .unwrap();
        assert_eq!(message.content, "Toujours disponible ?");
    }

    #[tokio::test]
    async fn outsiders_cannot_read_or_write() {
        let buyer = Uuid::new_v4();
        let seller = Uuid::new_v4();

        let mut conversations = MockConversations::new();
        conversations.expect_get().returning(move |id| {
            Ok(Some(sample_conversation(id, buyer, seller)))
        });
        conversations.expect_insert_message().times(0);
        conversations.expect_list_messages().times(0);

        let service = service_with(
            conversations,
            MockProducts::new(),
            MockNotifications::new(),
        );

        let outsider = sample_user(Uuid::new_v4());
        let error = service
            .send_message(Uuid::new_v4(), &outsider, "salut")
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::Forbidden(_)));

        let error = service
            .messages_for(Uuid::new_v4(), outsider.id)
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::Forbidden(_)));
    }

    #[tokio::test]
    async fn empty_messages_are_rejected_before_storage() {
        let mut conversations = MockConversations::new();
        conversations.expect_get().times(0);
        conversations.expect_insert_message().times(0);

        let service = service_with(
            conversations,
            MockProducts::new(),
            MockNotifications::new(),
        );

        let error = service
            .send_message(
                Uuid::new_v4(),
                &sample_user(Uuid::new_v4()),
                "   ",
            )
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::Validation(_)));
    }

    #[tokio::test]
    async fn open_conversation_checks_the_seller() {
        let seller = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let mut products = MockProducts::new();
        products.expect_get_product().returning(move |id| {
            Ok(Some(Product {
                id,
                title: "Canapé".to_string(),
                description: None,
                price: "300 TND".to_string(),
                location: "Sfax".to_string(),
                image_url: None,
                category: "maison".to_string(),
                like_count: 0,
                view_count: 0,
                is_reserved: false,
                is_free: false,
                is_promoted: false,
                promoted_at: None,
                user_id: seller,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });

        let service = service_with(
            MockConversations::new(),
            products,
            MockNotifications::new(),
        );

        // Wrong seller id for the product.
        let error = service
            .open_conversation(
                Uuid::new_v4(),
                &NewConversation {
                    product_id,
                    seller_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::Validation(_)));

        // Seller talking to themselves.
        let error = service
            .open_conversation(
                seller,
                &NewConversation {
                    product_id,
                    seller_id: seller,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::Forbidden(_)));
    }
}
