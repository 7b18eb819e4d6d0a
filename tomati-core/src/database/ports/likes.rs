use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use tomati_model::like::LikeOutcome;

/// What storage reports back for an accepted like. The owner and title
/// ride along so the promotion engine can notify without a second read.
#[derive(Debug, Clone)]
pub struct LikeGrant {
    pub outcome: LikeOutcome,
    pub owner_id: Uuid,
    pub product_title: String,
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Record a like for `(product_id, user_id)` and settle the product's
    /// promotion state, atomically with respect to concurrent likes on
    /// the same product.
    ///
    /// Contract:
    /// - unknown product → `NotFound`
    /// - `user_id` owns the product → `Forbidden`, nothing written
    /// - duplicate `(product_id, user_id)` → `Conflict`, nothing written;
    ///   uniqueness must come from a storage-level constraint, not an
    ///   application existence check
    /// - on success, `like_count` is recomputed from the like records
    ///   (never incremented), and the promotion flag flips exactly once
    ///   when the count first reaches the threshold
    async fn record_like(
        &self,
        product_id: Uuid,
        user_id: Uuid,
    ) -> Result<LikeGrant>;

    /// Pure existence check, no side effects.
    async fn has_liked(&self, product_id: Uuid, user_id: Uuid)
    -> Result<bool>;
}
