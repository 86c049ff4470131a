use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures surfaced by the user and contact stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("phone number already registered")]
    DuplicatePhone,

    #[error("persistence failure: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization token missing")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid phone number or password")]
    InvalidCredentials,
}

/// Error returned by every HTTP handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("User with this phone number already exists")]
    DuplicatePhone,

    #[error("Endpoint not found")]
    NotFound { method: String, path: String },

    #[error("persistence failure: {0:#}")]
    Persistence(anyhow::Error),

    /// Failures outside the stores, such as hashing or token signing.
    #[error("internal failure: {0:#}")]
    Internal(anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicatePhone => Self::DuplicatePhone,
            StoreError::Persistence(inner) => Self::Persistence(inner),
        }
    }
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicatePhone => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Failure details stay in the server log.
        let body = match &self {
            Self::Persistence(e) => {
                error!(error = %format!("{e:#}"), "persistence error");
                json!({ "error": "Internal server error" })
            }
            Self::Internal(e) => {
                error!(error = %format!("{e:#}"), "internal error");
                json!({ "error": "Internal server error" })
            }
            Self::NotFound { method, path } => {
                json!({ "error": self.to_string(), "path": path, "method": method })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
