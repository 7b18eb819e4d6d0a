use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use super::jwt::validate_token;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppError;
use tomati_model::user::User;

/// Require a valid bearer token and attach the user to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;

    let claims = validate_token(&token, &state.config.auth.jwt_secret)
        .map_err(|_| AppError::unauthorized("Invalid token"))?;

    let user = state
        .users
        .get_user_by_id(claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::unauthorized("Invalid token"))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Require the authenticated user to be an admin. Must run after
/// [`auth_middleware`] in the layer stack.
pub async fn admin_middleware(
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    if !user.role.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Access token required"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AppError::unauthorized("Access token required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    fn request_with_auth(value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/api/products");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_token_is_extracted() {
        let request = request_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(
            extract_bearer_token(&request).unwrap(),
            "abc.def.ghi"
        );
    }

    #[test]
    fn missing_or_malformed_headers_are_unauthorized() {
        for request in [
            request_with_auth(None),
            request_with_auth(Some("Basic dXNlcjpwYXNz")),
            request_with_auth(Some("bearer lowercase-scheme")),
        ] {
            let error = extract_bearer_token(&request).unwrap_err();
            assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        }
    }
}
