use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};
use tomati_model::like::{LikeResponse, LikedResponse};
use tomati_model::product::{
    NewProduct, Product, ProductFilter, ProductPatch,
};
use tomati_model::user::User;

/// `GET /api/products` — public catalog listing with filters.
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.list_products(&filter).await?;
    Ok(Json(products))
}

/// `GET /api/products/promoted` — promoted listings, oldest promotion
/// first.
pub async fn promoted_products_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.list_promoted().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}` — public product detail.
///
/// Counts a view as a side effect; a failed counter bump never fails
/// the read.
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let product = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    if let Err(error) = state.products.increment_views(id).await {
        debug!(product_id = %id, %error, "failed to count view");
    }

    Ok(Json(product))
}

/// `GET /api/products/mine` — the caller's own listings.
pub async fn my_products_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.list_by_owner(user.id).await?;
    Ok(Json(products))
}

/// `POST /api/products` — create a listing owned by the caller.
pub async fn create_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<NewProduct>,
) -> AppResult<Json<Product>> {
    request.validate().map_err(AppError::bad_request)?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::now_v7(),
        title: request.title,
        description: request.description,
        price: request.price,
        location: request.location,
        image_url: request.image_url,
        category: request.category,
        like_count: 0,
        view_count: 0,
        is_reserved: false,
        is_free: request.is_free,
        is_promoted: false,
        promoted_at: None,
        user_id: user.id,
        created_at: now,
        updated_at: now,
    };

    state.products.create_product(&product).await?;
    Ok(Json(product))
}

/// `PUT /api/products/{id}` — owner or admin only.
pub async fn update_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProductPatch>,
) -> AppResult<Json<Product>> {
    let existing = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    if existing.user_id != user.id && !user.role.is_admin() {
        return Err(AppError::forbidden(
            "only the owner can edit this product",
        ));
    }

    let updated = state
        .products
        .update_product(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(updated))
}

/// `DELETE /api/products/{id}` — owner or admin only.
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let existing = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    if existing.user_id != user.id && !user.role.is_admin() {
        return Err(AppError::forbidden(
            "only the owner can delete this product",
        ));
    }

    if !state.products.delete_product(id).await? {
        return Err(AppError::not_found("Product not found"));
    }

    Ok(Json(json!({ "success": true })))
}

/// `POST /api/products/{id}/like`
///
/// Records the caller's like and reports the authoritative count plus
/// whether this call crossed the promotion threshold. Self-likes are
/// forbidden and duplicates conflict; neither changes any state.
pub async fn like_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LikeResponse>> {
    let outcome = state.promotion_engine.record_like(id, user.id).await?;

    let message = if outcome.was_promoted {
        "Produit aimé et promu !"
    } else {
        "Produit aimé !"
    };

    Ok(Json(LikeResponse::from_outcome(message, outcome)))
}

/// `GET /api/products/{id}/liked` — has the caller liked this product?
pub async fn liked_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LikedResponse>> {
    let liked = state.promotion_engine.has_liked(id, user.id).await?;
    Ok(Json(LikedResponse { liked }))
}
