use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use xprecipes_core::{ImageError, ValidationErrors};

use super::ErrorResponse;
use crate::auth::TokenError;
use crate::repo::RepoError;
use crate::storage::StorageError;

/// Failure of a request handler, rendered as a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username already exists")]
    DuplicateUsername,

    #[error("recipe not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Repo(RepoError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{0}")]
    Internal(String),
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateUsername => ApiError::DuplicateUsername,
            other => ApiError::Repo(other),
        }
    }
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::Image(err) => message(StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::InvalidCredentials => {
                message(StatusCode::BAD_REQUEST, "Invalid username or password")
            }
            ApiError::DuplicateUsername => message(StatusCode::BAD_REQUEST, "Username already exists"),
            ApiError::NotFound => message(StatusCode::NOT_FOUND, "Recipe not found"),
            ApiError::BadRequest(msg) => message(StatusCode::BAD_REQUEST, msg),
            ApiError::Repo(_)
            | ApiError::Storage(_)
            | ApiError::Token(_)
            | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
