use super::CredentialsRequest;
use crate::api::{ApiError, ErrorResponse, JsonObject};
use crate::auth::verify_password;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use xprecipes_core::Credentials;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = CredentialsRequest, example = json!({"username": "user", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid fields or credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonObject(payload): JsonObject,
) -> Result<impl IntoResponse, ApiError> {
    let Credentials { username, password } = Credentials::from_payload(&payload)?;

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let password_hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| ApiError::Internal(format!("password check task failed: {}", e)))?;
    if !matches {
        return Err(ApiError::InvalidCredentials);
    }

    let pair = state.tokens.issue_pair(user.id)?;

    Ok(Json(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}
