//! Application error types.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use moodyme_core::auth::SessionError;
use moodyme_core::content::ContentError;
use moodyme_core::directory::DirectoryError;
use moodyme_core::documents::DocumentError;
use moodyme_core::identity::IdentityError;
use moodyme_core::identity::admin::AdminSetupError;
use moodyme_core::stats::StatsError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.as_str()),
            AppError::Unsupported(m) => (StatusCode::METHOD_NOT_ALLOWED, m.as_str()),
            AppError::Provider(m) => {
                error!(error = %m, "upstream provider failure");
                (StatusCode::BAD_GATEWAY, m.as_str())
            }
            AppError::Internal(m) => {
                error!(error = %m, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        let body = Json(ErrorResponse {
            success: false,
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidSignature | SessionError::Expired | SessionError::Malformed(_) => {
                AppError::Unauthorized("Invalid or expired session".into())
            }
            SessionError::Encode(msg) => AppError::Internal(msg),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::EmailExists => AppError::Validation(e.to_string()),
            IdentityError::UserNotFound => AppError::NotFound("User not found".into()),
            IdentityError::InvalidCredential => {
                AppError::Unauthorized("Invalid credentials".into())
            }
            IdentityError::UserDisabled => AppError::Unauthorized("Account is inactive".into()),
            IdentityError::Provider(msg) => AppError::Provider(msg),
            IdentityError::Config(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AdminSetupError> for AppError {
    fn from(e: AdminSetupError) -> Self {
        match e {
            AdminSetupError::Validation(msg) => AppError::Validation(msg),
            AdminSetupError::UnknownEmail(_) => AppError::NotFound("User not found".into()),
            AdminSetupError::Identity(e) => AppError::from(e),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::NotFound { .. } => AppError::NotFound(e.to_string()),
            DocumentError::Backend(msg) => AppError::Provider(msg),
            DocumentError::Malformed(msg) | DocumentError::Config(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ContentError> for AppError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::NotFound => AppError::NotFound("Content not found".into()),
            ContentError::UnsupportedOperation => AppError::Unsupported(e.to_string()),
            ContentError::Validation(msg) => AppError::Validation(msg),
            ContentError::Store(e) => AppError::from(e),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Identity(e) => AppError::from(e),
            DirectoryError::Documents(e) => AppError::from(e),
        }
    }
}

impl From<StatsError> for AppError {
    fn from(e: StatsError) -> Self {
        match e {
            StatsError::Identity(e) => AppError::from(e),
            StatsError::Content(e) => AppError::from(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}
