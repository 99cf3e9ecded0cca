use crate::api::{ApiError, ErrorResponse};
use crate::auth::RefreshUser;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[utoipa::path(
    post,
    path = "/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Missing or invalid refresh token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refresh(
    user: RefreshUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let access_token = state.tokens.reissue_access(&user.claims)?;
    tracing::debug!(user_id = %user.user_id, "refreshed access token");
    Ok(Json(RefreshResponse { access_token }))
}
