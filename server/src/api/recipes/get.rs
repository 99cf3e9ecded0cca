use super::RecipeResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use xprecipes_core::DEFAULT_IMAGE_KEY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    /// Where to fetch the image; null when the recipe has none.
    pub image_url: Option<String>,
}

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recipe = state
        .recipes
        .find_owned(id, user.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let image_url = if recipe.image_key == DEFAULT_IMAGE_KEY {
        None
    } else {
        Some(
            state
                .storage
                .url_for(&state.image_bucket, &recipe.image_key)
                .await?,
        )
    };

    Ok(Json(RecipeDetailResponse {
        recipe: RecipeResponse::from(recipe),
        image_url,
    }))
}
