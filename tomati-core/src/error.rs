use thiserror::Error;

/// Error taxonomy shared by every marketplace operation.
///
/// The first four variants are terminal and carried verbatim to the
/// client; `Internal` wraps storage or transport failures and is the only
/// variant a caller may reasonably retry.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// The user-facing message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            MarketError::NotFound(msg)
            | MarketError::Unauthorized(msg)
            | MarketError::Forbidden(msg)
            | MarketError::Conflict(msg)
            | MarketError::Validation(msg)
            | MarketError::Internal(msg) => msg,
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
