use async_trait::async_trait;

use crate::error::Result;
use tomati_model::stats::MarketStats;

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Aggregate totals for the admin dashboard.
    async fn market_stats(&self) -> Result<MarketStats>;
}
