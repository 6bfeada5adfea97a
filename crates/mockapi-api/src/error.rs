//! API error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error type. Rendered by [`crate::response::Payload`] as
/// `{"message": "<text>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown collection or resource.
    #[error("{0}")]
    NotFound(String),

    /// Unsupported path pattern or unreadable input.
    #[error("{0}")]
    BadRequest(String),

    /// Request method outside GET, POST, PUT, DELETE.
    #[error("{0}")]
    MethodNotAllowed(String),

    /// The store could not persist a mutation.
    #[error("{0}")]
    SaveFailed(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Unsupported URI for a mutating method.
    pub fn unsupported() -> Self {
        ApiError::BadRequest("URI not supported".to_string())
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::SaveFailed(_) => StatusCode::EXPECTATION_FAILED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<mockapi_store::StoreError> for ApiError {
    fn from(err: mockapi_store::StoreError) -> Self {
        match err {
            mockapi_store::StoreError::CollectionNotFound(_) => {
                ApiError::NotFound("Invalid collection".to_string())
            }
            mockapi_store::StoreError::Persistence(_) => {
                ApiError::SaveFailed("Save operation failed".to_string())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
