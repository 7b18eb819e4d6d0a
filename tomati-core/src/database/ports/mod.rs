//! Storage port traits. One trait per concern; PostgreSQL
//! implementations live in [`crate::database::postgres`].

pub mod categories;
pub mod likes;
pub mod messaging;
pub mod notifications;
pub mod products;
pub mod stats;
pub mod users;

pub use categories::CategoryRepository;
pub use likes::{LikeGrant, LikeRepository};
pub use messaging::ConversationRepository;
pub use notifications::NotificationRepository;
pub use products::ProductRepository;
pub use stats::StatsRepository;
pub use users::UserRepository;
