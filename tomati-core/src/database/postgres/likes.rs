use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::ports::likes::{LikeGrant, LikeRepository};
use crate::error::{MarketError, Result};
use tomati_model::like::{LikeOutcome, PROMOTION_THRESHOLD};

#[derive(Debug, Clone)]
pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn record_like(
        &self,
        product_id: Uuid,
        user_id: Uuid,
    ) -> Result<LikeGrant> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            MarketError::Internal(format!("Failed to start transaction: {e}"))
        })?;

        // Row lock on the product serializes concurrent likes for the
        // same listing: the recount below always observes a settled like
        // set, and the promotion transition can fire at most once.
        let product = sqlx::query(
            r#"
            SELECT user_id, title, is_promoted
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to load product for like: {e}"
            ))
        })?
        .ok_or_else(|| {
            MarketError::NotFound("Product not found".to_string())
        })?;

        let owner_id: Uuid = product.try_get("user_id").map_err(|e| {
            MarketError::Internal(format!("Failed to read product owner: {e}"))
        })?;
        let product_title: String = product.try_get("title").map_err(|e| {
            MarketError::Internal(format!("Failed to read product title: {e}"))
        })?;
        let already_promoted: bool =
            product.try_get("is_promoted").map_err(|e| {
                MarketError::Internal(format!(
                    "Failed to read promotion flag: {e}"
                ))
            })?;

        if owner_id == user_id {
            return Err(MarketError::Forbidden(
                "cannot like your own product".to_string(),
            ));
        }

        // The composite primary key on (product_id, user_id) is the only
        // duplicate guard; an existence check before the insert would
        // race with a second request from the same user.
        let inserted = sqlx::query(
            "INSERT INTO product_likes (product_id, user_id) VALUES ($1, $2)",
        )
        .bind(product_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(MarketError::Conflict(
                    "already liked".to_string(),
                ));
            }
            Err(e) => {
                return Err(MarketError::Internal(format!(
                    "Failed to insert like: {e}"
                )));
            }
        }

        // Authoritative recount rather than an increment; self-healing
        // against any historical drift in the cached counter.
        let new_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM product_likes WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            MarketError::Internal(format!("Failed to recount likes: {e}"))
        })?;

        let promotes = !already_promoted && new_count >= PROMOTION_THRESHOLD;

        sqlx::query(
            r#"
            UPDATE products
            SET like_count = $2,
                is_promoted = is_promoted OR $3,
                promoted_at = CASE WHEN $3 THEN NOW() ELSE promoted_at END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .bind(new_count)
        .bind(promotes)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to update like count: {e}"
            ))
        })?;

        tx.commit().await.map_err(|e| {
            MarketError::Internal(format!("Failed to commit like: {e}"))
        })?;

        Ok(LikeGrant {
            outcome: LikeOutcome {
                new_like_count: new_count,
                was_promoted: promotes,
            },
            owner_id,
            product_title,
        })
    }

    async fn has_liked(
        &self,
        product_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool> {
        let liked: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM product_likes
                WHERE product_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to check like status: {e}"
            ))
        })?;

        Ok(liked)
    }
}
