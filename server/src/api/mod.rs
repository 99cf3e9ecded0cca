pub mod auth;
pub mod error;
pub mod health;
pub mod payload;
pub mod recipes;

pub use error::ApiError;
pub use payload::JsonObject;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use crate::state::AppState;

/// Unauthenticated liveness probe; kept out of request logs.
pub const HEALTH_PATH: &str = "/ping";

/// Largest request body accepted. Leaves room above the image limit so that
/// oversize uploads are reported by the image gate rather than cut off.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Plain confirmation body, e.g. `{"message": "Recipe deleted"}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The complete application router, with state applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health::ping))
        .merge(auth::router())
        .merge(recipes::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        paths(health::ping),
        components(schemas(ErrorResponse, MessageResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> =
        vec![auth::ApiDoc::openapi(), recipes::ApiDoc::openapi()];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
