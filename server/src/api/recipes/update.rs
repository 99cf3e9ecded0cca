use super::submission::{RecipeForm, RecipeMultipartRequest, RecipeRequest};
use super::{store_image, RecipeResponse};
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use xprecipes_core::RecipeSubmission;

/// Replaces every field. The image changes only when a new one is sent; the
/// previous object stays in the bucket.
#[utoipa::path(
    put,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body(content(
        (RecipeRequest = "application/json"),
        (RecipeMultipartRequest = "multipart/form-data")
    )),
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid fields or image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    form: RecipeForm,
) -> Result<impl IntoResponse, ApiError> {
    let submission = RecipeSubmission::from_payload(&form.fields)?.sanitized()?;

    if state.recipes.find_owned(id, user.user_id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let new_image_key = match form.image {
        Some(upload) => Some(store_image(&state, upload).await?),
        None => None,
    };

    let recipe = state
        .recipes
        .update_owned(id, user.user_id, &submission, new_image_key.as_deref())
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(recipe_id = %recipe.id, "updated recipe");

    Ok(Json(RecipeResponse::from(recipe)))
}
