use super::submission::{RecipeForm, RecipeMultipartRequest, RecipeRequest};
use super::{store_image, RecipeResponse};
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use xprecipes_core::{RecipeSubmission, DEFAULT_IMAGE_KEY};

#[utoipa::path(
    post,
    path = "/recipes",
    tag = "recipes",
    request_body(content(
        (RecipeRequest = "application/json"),
        (RecipeMultipartRequest = "multipart/form-data")
    )),
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeResponse),
        (status = 400, description = "Invalid fields or image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    user: AuthUser,
    State(state): State<AppState>,
    form: RecipeForm,
) -> Result<impl IntoResponse, ApiError> {
    let submission = RecipeSubmission::from_payload(&form.fields)?.sanitized()?;

    let image_key = match form.image {
        Some(upload) => store_image(&state, upload).await?,
        None => DEFAULT_IMAGE_KEY.to_string(),
    };

    let recipe = state
        .recipes
        .insert(user.user_id, &submission, &image_key)
        .await?;
    tracing::info!(recipe_id = %recipe.id, user_id = %user.user_id, "created recipe");

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}
