//! Buyer/seller conversations and chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A conversation between a buyer and a seller about one product.
/// Unique per (product, buyer, seller) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub product_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub last_message_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }

    /// The participant that is not `user_id`.
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.buyer_id == user_id {
            self.seller_id
        } else {
            self.buyer_id
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Conversation list entry enriched for the inbox screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_title: Option<String>,
    pub product_image: Option<String>,
    pub other_user_id: Uuid,
    pub other_user_name: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: i64,
    pub is_buyer: bool,
}

/// Payload for `POST /api/conversations`. The buyer is the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConversation {
    pub product_id: Uuid,
    pub seller_id: Uuid,
}

/// Payload for `POST /api/conversations/{id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_resolves_both_directions() {
        let buyer = Uuid::new_v4();
        let seller = Uuid::new_v4();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            buyer_id: buyer,
            seller_id: seller,
            last_message_at: Utc::now(),
            created_at: Utc::now(),
        };

        assert_eq!(conversation.counterpart(buyer), seller);
        assert_eq!(conversation.counterpart(seller), buyer);
        assert!(conversation.involves(buyer));
        assert!(!conversation.involves(Uuid::new_v4()));
    }
}
