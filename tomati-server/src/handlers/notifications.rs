use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};
use tomati_model::notification::Notification;
use tomati_model::user::User;

/// `GET /api/notifications` — the caller's notifications, newest first.
pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state.notifications.list_for_user(user.id).await?;
    Ok(Json(notifications))
}

/// `GET /api/notifications/unread-count`
pub async fn unread_count_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Value>> {
    let count = state.notifications.unread_count(user.id).await?;
    Ok(Json(json!({ "count": count })))
}

/// `POST /api/notifications/{id}/read`
pub async fn mark_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.notifications.mark_read(id, user.id).await? {
        return Err(AppError::not_found("Notification not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/notifications/read-all`
pub async fn mark_all_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Value>> {
    let updated = state.notifications.mark_all_read(user.id).await?;
    Ok(Json(json!({ "updated": updated })))
}

/// `DELETE /api/notifications/{id}`
pub async fn delete_notification_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.notifications.delete(id, user.id).await? {
        return Err(AppError::not_found("Notification not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
