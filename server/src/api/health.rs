use super::MessageResponse;
use axum::{response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/ping",
    tag = "health",
    responses(
        (status = 200, description = "Server is up", body = MessageResponse)
    )
)]
pub async fn ping() -> impl IntoResponse {
    Json(MessageResponse::new("pong"))
}
