use crate::api::ErrorResponse;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::{Claims, TokenKind};

/// Extractor that validates a bearer access token and provides the caller's identity.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> impl IntoResponse {
///     // user.user_id owns whatever the handler touches
/// }
/// ```
pub struct AuthUser {
    pub user_id: Uuid,
    pub claims: Claims,
}

/// Same as [`AuthUser`], but only accepts refresh tokens.
pub struct RefreshUser {
    pub user_id: Uuid,
    pub claims: Claims,
}

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingHeader => "Missing Authorization header",
            AuthError::InvalidHeader | AuthError::InvalidFormat | AuthError::InvalidToken => {
                "Token is invalid"
            }
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

fn bearer_claims(parts: &Parts, state: &AppState, kind: TokenKind) -> Result<Claims, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    state.tokens.verify(token.trim(), kind).map_err(|e| {
        tracing::debug!(error = %e, "rejected {} token", kind);
        AuthError::InvalidToken
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let claims = bearer_claims(parts, &state, TokenKind::Access)?;
        Ok(AuthUser {
            user_id: claims.sub,
            claims,
        })
    }
}

impl<S> FromRequestParts<S> for RefreshUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let claims = bearer_claims(parts, &state, TokenKind::Refresh)?;
        Ok(RefreshUser {
            user_id: claims.sub,
            claims,
        })
    }
}
