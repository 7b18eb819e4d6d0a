use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use uuid::Uuid;

use super::jwt::generate_token;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};
use tomati_model::user::{
    AuthResponse, LoginRequest, PublicUser, RegisterRequest, User, UserRole,
};

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    request.validate().map_err(AppError::bad_request)?;

    let email = request.email.trim().to_lowercase();

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(request.password.as_bytes(), &salt)
        .map_err(|_| AppError::internal("Failed to hash password"))?
        .to_string();

    let now = Utc::now();
    let user = User {
        id: Uuid::now_v7(),
        email,
        display_name: request.display_name.clone(),
        role: UserRole::User,
        created_at: now,
        updated_at: now,
    };

    // Duplicate emails surface as Conflict from the unique constraint.
    state.users.create_user(&user, &password_hash).await?;

    let token = generate_token(
        user.id,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_secs,
    )
    .map_err(|_| AppError::internal("Failed to generate access token"))?;

    Ok(Json(AuthResponse {
        user: user.to_public(),
        token,
    }))
}

/// `POST /api/auth/signin`
pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = request.email.trim().to_lowercase();

    let user = state
        .users
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let password_hash = state
        .users
        .get_password_hash(user.id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let parsed_hash = PasswordHash::new(&password_hash)
        .map_err(|_| AppError::internal("Invalid password hash"))?;

    Argon2::default()
        .verify_password(request.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::unauthorized("Invalid credentials"))?;

    let token = generate_token(
        user.id,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_secs,
    )
    .map_err(|_| AppError::internal("Failed to generate access token"))?;

    Ok(Json(AuthResponse {
        user: user.to_public(),
        token,
    }))
}

/// `GET /api/auth/me`
pub async fn me(Extension(user): Extension<User>) -> Json<PublicUser> {
    Json(user.to_public())
}
