//! Core data model definitions shared across Tomati crates.
#![allow(missing_docs)]

pub mod category;
pub mod like;
pub mod message;
pub mod notification;
pub mod product;
pub mod stats;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use category::{Category, NewCategory};
pub use like::{
    LikeOutcome, LikeResponse, LikedResponse, PROMOTION_THRESHOLD,
};
pub use message::{
    ChatMessage, Conversation, ConversationSummary, NewChatMessage,
    NewConversation,
};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use product::{NewProduct, Product, ProductFilter, ProductPatch};
pub use stats::MarketStats;
pub use user::{
    AuthResponse, Claims, LoginRequest, PublicUser, RegisterRequest, User,
    UserRole,
};
