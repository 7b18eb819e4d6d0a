use axum::{Json, extract::State};
use chrono::Utc;
use uuid::Uuid;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};
use tomati_model::category::{Category, NewCategory};

/// `GET /api/categories` — public, ordered by name.
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.categories.list_categories().await?;
    Ok(Json(categories))
}

/// `POST /api/categories` — admin only.
pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(request): Json<NewCategory>,
) -> AppResult<Json<Category>> {
    request.validate().map_err(AppError::bad_request)?;

    let category = Category {
        id: Uuid::now_v7(),
        name: request.name.trim().to_string(),
        icon: request.icon,
        created_at: Utc::now(),
    };

    state.categories.create_category(&category).await?;
    Ok(Json(category))
}
