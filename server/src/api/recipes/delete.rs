use crate::api::{ApiError, ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use xprecipes_core::DEFAULT_IMAGE_KEY;

#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recipe = state
        .recipes
        .find_owned(id, user.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    // Image first: a failed storage call must leave the row in place.
    if recipe.image_key != DEFAULT_IMAGE_KEY {
        state
            .storage
            .delete(&state.image_bucket, &recipe.image_key)
            .await?;
    }

    if !state.recipes.delete_owned(id, user.user_id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(recipe_id = %id, "deleted recipe");

    Ok(Json(MessageResponse::new("Recipe deleted")))
}
