pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

use crate::state::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::{OpenApi, ToSchema};

/// Body shared by register and login.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Returns the router for the token endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/refresh", post(refresh::refresh))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        register::register,
        login::login,
        logout::logout,
        refresh::refresh,
    ),
    components(schemas(
        CredentialsRequest,
        login::LoginResponse,
        refresh::RefreshResponse,
    ))
)]
pub struct ApiDoc;
