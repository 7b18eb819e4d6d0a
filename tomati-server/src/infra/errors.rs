use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use tomati_core::MarketError;

pub type AppResult<T> = Result<T, AppError>;

/// HTTP-facing error: a status code plus a user-displayable message.
/// Serialized as the flat `{ "error": message }` body every endpoint uses.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::NotFound(msg) => Self::not_found(msg),
            MarketError::Unauthorized(msg) => Self::unauthorized(msg),
            MarketError::Forbidden(msg) => Self::forbidden(msg),
            MarketError::Conflict(msg) => Self::conflict(msg),
            MarketError::Validation(msg) => Self::bad_request(msg),
            MarketError::Internal(msg) => {
                // Storage details stay in the logs, not in responses.
                tracing::error!(error = %msg, "internal error");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "internal error");
        Self::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_errors_map_to_expected_statuses() {
        let cases = [
            (
                MarketError::NotFound("Product not found".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                MarketError::Unauthorized("Access token required".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                MarketError::Forbidden(
                    "cannot like your own product".to_string(),
                ),
                StatusCode::FORBIDDEN,
            ),
            (
                MarketError::Conflict("already liked".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                MarketError::Validation("title is required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, status) in cases {
            let expected = error.message().to_string();
            let app_error = AppError::from(error);
            assert_eq!(app_error.status, status);
            assert_eq!(app_error.message, expected);
        }
    }

    #[test]
    fn internal_errors_hide_their_detail() {
        let app_error = AppError::from(MarketError::Internal(
            "connection refused".to_string(),
        ));
        assert_eq!(app_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app_error.message, "Internal server error");
    }
}
