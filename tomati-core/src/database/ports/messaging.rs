use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use tomati_model::message::{
    ChatMessage, Conversation, ConversationSummary,
};

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Fetch the conversation for `(product, buyer, seller)`, creating it
    /// if absent. Safe under concurrent callers thanks to the unique
    /// constraint on the triple.
    async fn get_or_create(
        &self,
        product_id: Uuid,
        buyer_id: Uuid,
        seller_id: Uuid,
    ) -> Result<Conversation>;

    async fn get(&self, id: Uuid) -> Result<Option<Conversation>>;

    /// Inbox entries for a user, most recently active first.
    async fn list_summaries(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConversationSummary>>;

    /// Insert a message and bump the conversation's `last_message_at`
    /// in the same transaction.
    async fn insert_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<ChatMessage>;

    /// Messages in chronological order.
    async fn list_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<ChatMessage>>;

    /// Mark every message not sent by `reader_id` as read; returns the
    /// number of rows affected.
    async fn mark_counterpart_read(
        &self,
        conversation_id: Uuid,
        reader_id: Uuid,
    ) -> Result<u64>;
}
