use axum::{Json, extract::State};

use crate::infra::{app_state::AppState, errors::AppResult};
use tomati_model::stats::MarketStats;

/// `GET /api/admin/stats` — marketplace totals for the dashboard.
pub async fn market_stats_handler(
    State(state): State<AppState>,
) -> AppResult<Json<MarketStats>> {
    let stats = state.stats.market_stats().await?;
    Ok(Json(stats))
}
