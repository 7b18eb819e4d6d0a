use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::ports::messaging::ConversationRepository;
use crate::error::{MarketError, Result};
use tomati_model::message::{
    ChatMessage, Conversation, ConversationSummary,
};

#[derive(Debug, Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_conversation(row: &PgRow) -> Result<Conversation> {
        let read = |e: sqlx::Error| {
            MarketError::Internal(format!(
                "Failed to read conversation row: {e}"
            ))
        };

        Ok(Conversation {
            id: row.try_get("id").map_err(read)?,
            product_id: row.try_get("product_id").map_err(read)?,
            buyer_id: row.try_get("buyer_id").map_err(read)?,
            seller_id: row.try_get("seller_id").map_err(read)?,
            last_message_at: row.try_get("last_message_at").map_err(read)?,
            created_at: row.try_get("created_at").map_err(read)?,
        })
    }

    fn map_message(row: &PgRow) -> Result<ChatMessage> {
        let read = |e: sqlx::Error| {
            MarketError::Internal(format!(
                "Failed to read message row: {e}"
            ))
        };

        Ok(ChatMessage {
            id: row.try_get("id").map_err(read)?,
            conversation_id: row.try_get("conversation_id").map_err(read)?,
            sender_id: row.try_get("sender_id").map_err(read)?,
            content: row.try_get("content").map_err(read)?,
            is_read: row.try_get("is_read").map_err(read)?,
            created_at: row.try_get("created_at").map_err(read)?,
        })
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn get_or_create(
        &self,
        product_id: Uuid,
        buyer_id: Uuid,
        seller_id: Uuid,
    ) -> Result<Conversation> {
        // Insert first; the unique constraint on the triple makes this
        // race-safe, and the follow-up select reads whichever row won.
        sqlx::query(
            r#"
            INSERT INTO conversations (id, product_id, buyer_id, seller_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (product_id, buyer_id, seller_id) DO NOTHING
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(product_id)
        .bind(buyer_id)
        .bind(seller_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to create conversation: {e}"
            ))
        })?;

        let row = sqlx::query(
            r#"
            SELECT id, product_id, buyer_id, seller_id,
                   last_message_at, created_at
            FROM conversations
            WHERE product_id = $1 AND buyer_id = $2 AND seller_id = $3
            "#,
        )
        .bind(product_id)
        .bind(buyer_id)
        .bind(seller_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to fetch conversation: {e}"
            ))
        })?;

        Self::map_conversation(&row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Conversation>> {
        let row = sqlx::query(
            r#"
            SELECT id, product_id, buyer_id, seller_id,
                   last_message_at, created_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to fetch conversation: {e}"
            ))
        })?;

        row.as_ref().map(Self::map_conversation).transpose()
    }

    async fn list_summaries(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConversationSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.product_id, c.buyer_id, c.seller_id,
                   c.last_message_at,
                   p.title AS product_title,
                   p.image_url AS product_image,
                   u.display_name AS other_user_name,
                   (
                       SELECT m.content FROM messages m
                       WHERE m.conversation_id = c.id
                       ORDER BY m.created_at DESC
                       LIMIT 1
                   ) AS last_message,
                   (
                       SELECT COUNT(*) FROM messages m
                       WHERE m.conversation_id = c.id
                         AND m.is_read = FALSE
                         AND m.sender_id <> $1
                   ) AS unread_count
            FROM conversations c
            LEFT JOIN products p ON p.id = c.product_id
            LEFT JOIN users u ON u.id = CASE
                WHEN c.buyer_id = $1 THEN c.seller_id
                ELSE c.buyer_id
            END
            WHERE c.buyer_id = $1 OR c.seller_id = $1
            ORDER BY c.last_message_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to list conversations: {e}"
            ))
        })?;

        let read = |e: sqlx::Error| {
            MarketError::Internal(format!(
                "Failed to read conversation summary: {e}"
            ))
        };

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let buyer_id: Uuid = row.try_get("buyer_id").map_err(read)?;
            let seller_id: Uuid = row.try_get("seller_id").map_err(read)?;
            let is_buyer = buyer_id == user_id;

            summaries.push(ConversationSummary {
                id: row.try_get("id").map_err(read)?,
                product_id: row.try_get("product_id").map_err(read)?,
                product_title: row
                    .try_get("product_title")
                    .map_err(read)?,
                product_image: row
                    .try_get("product_image")
                    .map_err(read)?,
                other_user_id: if is_buyer { seller_id } else { buyer_id },
                other_user_name: row
                    .try_get("other_user_name")
                    .map_err(read)?,
                last_message: row.try_get("last_message").map_err(read)?,
                last_message_at: row
                    .try_get("last_message_at")
                    .map_err(read)?,
                unread_count: row.try_get("unread_count").map_err(read)?,
                is_buyer,
            });
        }

        Ok(summaries)
    }

    async fn insert_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<ChatMessage> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            MarketError::Internal(format!("Failed to start transaction: {e}"))
        })?;

        let message = ChatMessage {
            id: Uuid::now_v7(),
            conversation_id,
            sender_id,
            content: content.to_string(),
            is_read: false,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO messages (
                id, conversation_id, sender_id, content, is_read, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            MarketError::Internal(format!("Failed to insert message: {e}"))
        })?;

        sqlx::query(
            "UPDATE conversations SET last_message_at = $2 WHERE id = $1",
        )
        .bind(conversation_id)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to bump conversation activity: {e}"
            ))
        })?;

        tx.commit().await.map_err(|e| {
            MarketError::Internal(format!("Failed to commit message: {e}"))
        })?;

        Ok(message)
    }

    async fn list_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<ChatMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender_id, content,
                   is_read, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(conversation_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!("Failed to list messages: {e}"))
        })?;

        rows.iter().map(Self::map_message).collect()
    }

    async fn mark_counterpart_read(
        &self,
        conversation_id: Uuid,
        reader_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET is_read = TRUE
            WHERE conversation_id = $1
              AND sender_id <> $2
              AND is_read = FALSE
            "#,
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to mark messages read: {e}"
            ))
        })?;

        Ok(result.rows_affected())
    }
}
