use axum::{
    Json, Router, middleware,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    auth::{self, handlers as auth_handlers},
    handlers::{
        admin, categories, health, messages, notifications, products,
    },
};

/// Build the full application: API routes, CORS, and request tracing.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state);

    Router::new()
        .route("/ping", get(ping_handler))
        .merge(create_api_router(state.clone()))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// All `/api` routes.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api", api_routes(state))
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(admin_routes(state))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        // Health endpoints for production monitoring
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::readiness_handler))
        // Authentication
        .route("/auth/signup", post(auth_handlers::signup))
        .route("/auth/signin", post(auth_handlers::signin))
        // Public catalog
        .route("/products", get(products::list_products_handler))
        .route(
            "/products/promoted",
            get(products::promoted_products_handler),
        )
        .route("/products/{id}", get(products::get_product_handler))
        .route("/categories", get(categories::list_categories_handler))
}

/// Routes requiring a valid bearer token.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth_handlers::me))
        // Listings owned by the caller
        .route("/products", post(products::create_product_handler))
        .route("/products/mine", get(products::my_products_handler))
        .route("/products/{id}", put(products::update_product_handler))
        .route(
            "/products/{id}",
            delete(products::delete_product_handler),
        )
        // Likes and promotion
        .route(
            "/products/{id}/like",
            post(products::like_product_handler),
        )
        .route(
            "/products/{id}/liked",
            get(products::liked_status_handler),
        )
        // Notifications
        .route(
            "/notifications",
            get(notifications::list_notifications_handler),
        )
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count_handler),
        )
        .route(
            "/notifications/read-all",
            post(notifications::mark_all_read_handler),
        )
        .route(
            "/notifications/{id}/read",
            post(notifications::mark_read_handler),
        )
        .route(
            "/notifications/{id}",
            delete(notifications::delete_notification_handler),
        )
        // Messaging
        .route(
            "/conversations",
            get(messages::list_conversations_handler)
                .post(messages::open_conversation_handler),
        )
        .route(
            "/conversations/{id}/messages",
            get(messages::list_messages_handler)
                .post(messages::send_message_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::middleware::auth_middleware,
        ))
}

/// Routes requiring the admin role. The auth layer is added last so it
/// runs first, leaving the admin check with a populated user extension.
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            post(categories::create_category_handler),
        )
        .route("/admin/stats", get(admin::market_stats_handler))
        .route_layer(middleware::from_fn(
            auth::middleware::admin_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::middleware::auth_middleware,
        ))
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    if state.config.dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<axum::http::HeaderValue> = state
        .config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| axum::http::HeaderValue::from_str(s).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]))
}

async fn ping_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Tomati Market server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
