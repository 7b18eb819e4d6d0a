//! Core library for the Tomati marketplace server.
//!
//! Hosts the domain services (promotion engine, notifications, messaging),
//! the storage port traits, and their PostgreSQL implementations. The HTTP
//! layer lives in `tomati-server`; shared data types in `tomati-model`.

pub mod database;
pub mod error;
pub mod messaging;
pub mod notifications;
pub mod promotion;

pub use error::{MarketError, Result};

/// Embedded schema migrations, applied on startup or via `db migrate`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
