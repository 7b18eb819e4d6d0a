use serde::{Deserialize, Serialize};

/// High-level marketplace totals returned by the admin dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MarketStats {
    pub total_products: i64,
    pub total_users: i64,
    pub total_categories: i64,
    pub total_likes: i64,
    pub promoted_products: i64,
    /// Listings created in the last 30 days
    pub recent_products: i64,
    /// Distinct sellers with a listing in the last 30 days
    pub active_sellers: i64,
}
