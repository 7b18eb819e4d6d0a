use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppResult};
use tomati_model::message::{
    ChatMessage, Conversation, ConversationSummary, NewChatMessage,
    NewConversation,
};
use tomati_model::user::User;

/// `POST /api/conversations` — open (or fetch) the caller's
/// conversation with a product's seller.
pub async fn open_conversation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<NewConversation>,
) -> AppResult<Json<Conversation>> {
    let conversation =
        state.messaging.open_conversation(user.id, &request).await?;
    Ok(Json(conversation))
}

/// `GET /api/conversations` — the caller's inbox.
pub async fn list_conversations_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    let conversations =
        state.messaging.conversations_for(user.id).await?;
    Ok(Json(conversations))
}

/// `GET /api/conversations/{id}/messages` — participant-only; marks the
/// counterpart's messages read.
pub async fn list_messages_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    let messages = state.messaging.messages_for(id, user.id).await?;
    Ok(Json(messages))
}

/// `POST /api/conversations/{id}/messages`
pub async fn send_message_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewChatMessage>,
) -> AppResult<Json<ChatMessage>> {
    let message = state
        .messaging
        .send_message(id, &user, &request.content)
        .await?;
    Ok(Json(message))
}
