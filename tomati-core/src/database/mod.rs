//! Storage layer: port traits and their PostgreSQL implementations.

pub mod ports;
pub mod postgres;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::{MarketError, Result};

/// Handle to the primary PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Connect and build a bounded connection pool.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                MarketError::Internal(format!(
                    "Failed to connect to PostgreSQL: {e}"
                ))
            })?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations.
    pub async fn initialize_schema(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            MarketError::Internal(format!("Failed to run migrations: {e}"))
        })
    }

    /// Cheap connectivity probe used by health endpoints.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MarketError::Internal(format!("Database ping failed: {e}"))
            })?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
