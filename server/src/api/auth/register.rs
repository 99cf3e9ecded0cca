use super::CredentialsRequest;
use crate::api::{ApiError, ErrorResponse, JsonObject, MessageResponse};
use crate::auth::hash_password;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use xprecipes_core::Credentials;

#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body(content = CredentialsRequest, example = json!({"username": "user", "password": "password"})),
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Invalid fields or username taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonObject(payload): JsonObject,
) -> Result<impl IntoResponse, ApiError> {
    let Credentials { username, password } = Credentials::from_payload(&payload)?;

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {}", e)))?;

    let user = state.users.create_user(&username, &password_hash).await?;
    tracing::info!(user_id = %user.id, "registered user");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("New user created!")),
    ))
}
