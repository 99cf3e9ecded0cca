use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// Ends the login the access token belongs to: the token itself, its refresh
/// token and every access token minted from that refresh token are refused
/// from now on.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Tokens revoked", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(user: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    state.tokens.revoke(&user.claims);
    tracing::info!(
        user_id = %user.user_id,
        revoked_tokens = state.tokens.revoked_count(),
        "logged out"
    );
    Json(MessageResponse::new("Successfully logged out"))
}
