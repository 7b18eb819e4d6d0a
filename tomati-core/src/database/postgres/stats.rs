use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::ports::stats::StatsRepository;
use crate::error::{MarketError, Result};
use tomati_model::stats::MarketStats;

#[derive(Debug, Clone)]
pub struct PostgresStatsRepository {
    pool: PgPool,
}

impl PostgresStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        sqlx::query_scalar(sql)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                MarketError::Internal(format!(
                    "Failed to compute dashboard stat: {e}"
                ))
            })
    }
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    async fn market_stats(&self) -> Result<MarketStats> {
        let total_products = self.count("SELECT COUNT(*) FROM products").await?;
        let total_users = self.count("SELECT COUNT(*) FROM users").await?;
        let total_categories =
            self.count("SELECT COUNT(*) FROM categories").await?;
        let total_likes =
            self.count("SELECT COUNT(*) FROM product_likes").await?;
        let promoted_products = self
            .count("SELECT COUNT(*) FROM products WHERE is_promoted")
            .await?;
        let recent_products = self
            .count(
                "SELECT COUNT(*) FROM products \
                 WHERE created_at >= NOW() - INTERVAL '30 days'",
            )
            .await?;
        let active_sellers = self
            .count(
                "SELECT COUNT(DISTINCT user_id) FROM products \
                 WHERE created_at >= NOW() - INTERVAL '30 days'",
            )
            .await?;

        Ok(MarketStats {
            total_products,
            total_users,
            total_categories,
            total_likes,
            promoted_products,
            recent_products,
            active_sellers,
        })
    }
}
