//! PostgreSQL implementations of the storage ports.
//!
//! Queries are bound at runtime and rows mapped by hand so the crate
//! builds without a live database; errors are wrapped into
//! [`crate::error::MarketError`] at the boundary.

pub mod categories;
pub mod likes;
pub mod messaging;
pub mod notifications;
pub mod products;
pub mod stats;
pub mod users;

pub use categories::PostgresCategoryRepository;
pub use likes::PostgresLikeRepository;
pub use messaging::PostgresConversationRepository;
pub use notifications::PostgresNotificationRepository;
pub use products::PostgresProductRepository;
pub use stats::PostgresStatsRepository;
pub use users::PostgresUserRepository;
