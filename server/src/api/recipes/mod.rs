pub mod create;
pub mod delete;
pub mod get;
pub mod submission;
pub mod update;

use crate::api::ApiError;
use crate::models::Recipe;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;
use xprecipes_core::{accept_image, ImageUpload};

/// Returns the router for /recipes endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create::create_recipe))
        .route(
            "/recipes/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        RecipeResponse,
        get::RecipeDetailResponse,
        submission::RecipeRequest,
        submission::RecipeMultipartRequest,
    ))
)]
pub struct ApiDoc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub ingredients: String,
    pub ingredient_quantity: f64,
    pub unit: String,
    pub calories: i32,
    /// Minutes.
    pub cooktime: i32,
    pub image_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            user_id: recipe.user_id,
            title: recipe.title,
            ingredients: recipe.ingredients,
            ingredient_quantity: recipe.ingredient_quantity,
            unit: recipe.unit,
            calories: recipe.calories,
            cooktime: recipe.cooktime,
            image_key: recipe.image_key,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// Gate an upload and put it in the image bucket. Returns the new key.
async fn store_image(state: &AppState, upload: ImageUpload) -> Result<String, ApiError> {
    let accepted = accept_image(&upload)?;

    state
        .storage
        .upload(
            &state.image_bucket,
            &accepted.key,
            upload.data,
            accepted.content_type,
        )
        .await?;

    tracing::info!(
        key = %accepted.key,
        bytes = upload.content_length,
        backend = state.storage.backend_name(),
        "stored recipe image"
    );
    Ok(accepted.key)
}

#[cfg(test)]
mod tests {
    use crate::storage::{MemoryObjectStore, StorageOp};
    use crate::test_support::{
        empty_request, json_request, multipart_request, png_bytes, soup, soup_fields, TestApp,
        BUCKET, IMAGE_BASE_URL,
    };
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};
    use xprecipes_core::{clean, DEFAULT_IMAGE_KEY, MAX_FILE_SIZE};

    fn recipe_uri(recipe: &Value) -> String {
        format!("/recipes/{}", recipe["id"].as_str().unwrap())
    }

    #[tokio::test]
    async fn test_create_soup_without_image() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let recipe = app.create_soup(&token).await;

        assert_eq!(recipe["title"], "Soup");
        assert_eq!(recipe["ingredients"], "salt");
        assert_eq!(recipe["ingredient_quantity"], 1.5);
        assert_eq!(recipe["unit"], "tsp");
        assert_eq!(recipe["calories"], 50);
        assert_eq!(recipe["cooktime"], 10);
        assert_eq!(recipe["image_key"], DEFAULT_IMAGE_KEY);
        assert!(app.storage.operations().is_empty());
        assert_eq!(app.repo.recipe_count(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_unit() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let mut payload = soup();
        payload["unit"] = json!("gallon");

        let (status, body) = app
            .send(json_request(Method::POST, "/recipes", Some(&token), payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"unit": ["unallowed value gallon"]}));
        assert_eq!(app.repo.recipe_count(), 0);
    }

    #[tokio::test]
    async fn test_create_reports_each_bad_field() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let payload = json!({
            "title": "ab",
            "ingredients": "salt",
            "ingredient_quantity": 1.5,
            "unit": "tsp",
            "calories": "fifty",
            "servings": 4
        });

        let (status, body) = app
            .send(json_request(Method::POST, "/recipes", Some(&token), payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["title"], json!(["min length is 3"]));
        assert_eq!(body["calories"], json!(["must be of integer type"]));
        assert_eq!(body["cooktime"], json!(["required field"]));
        assert_eq!(body["servings"], json!(["unknown field"]));
        assert!(body.get("unit").is_none());
    }

    #[tokio::test]
    async fn test_create_stores_sanitized_text() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let title = "<b>Tomato</b> soup<script>alert(1)</script>";
        let ingredients = "salt &amp; <i>pepper</i>";
        let mut payload = soup();
        payload["title"] = json!(title);
        payload["ingredients"] = json!(ingredients);

        let (status, body) = app
            .send(json_request(Method::POST, "/recipes", Some(&token), payload))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], clean(title));
        assert_eq!(body["ingredients"], clean(ingredients));
        assert_eq!(body["title"], "Tomato soup");
    }

    #[tokio::test]
    async fn test_escaped_markup_is_stored_escaped() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let mut payload = soup();
        payload["title"] = json!("&lt;script&gt;alert(1)&lt;/script&gt;");

        let (status, body) = app
            .send(json_request(Method::POST, "/recipes", Some(&token), payload))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let title = body["title"].as_str().unwrap();
        assert!(!title.contains('<'), "{title}");
        assert_eq!(title, "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[tokio::test]
    async fn test_markup_only_text_fails_length_checks() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let mut payload = soup();
        payload["title"] = json!("<script>evil()</script>");
        payload["ingredients"] = json!("<b></b>");

        let (status, body) = app
            .send(json_request(Method::POST, "/recipes", Some(&token), payload.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"title": ["min length is 3"], "ingredients": ["min length is 1"]})
        );
        assert_eq!(app.repo.recipe_count(), 0);

        let recipe = app.create_soup(&token).await;
        let (status, body) = app
            .send(json_request(
                Method::PUT,
                &recipe_uri(&recipe),
                Some(&token),
                payload,
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["title"], json!(["min length is 3"]));

        let (_, stored) = app
            .send(empty_request(Method::GET, &recipe_uri(&recipe), Some(&token)))
            .await;
        assert_eq!(stored["title"], "Soup");
    }

    #[tokio::test]
    async fn test_recipe_routes_require_token() {
        let app = TestApp::new();
        let (status, body) = app
            .send(json_request(Method::POST, "/recipes", None, soup()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "Missing Authorization header"}));

        let (status, body) = app
            .send(json_request(Method::POST, "/recipes", Some("invalidtoken"), soup()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "Token is invalid"}));
    }

    #[tokio::test]
    async fn test_create_with_image_then_get() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let png = png_bytes();

        let (status, recipe) = app
            .send(multipart_request(
                Method::POST,
                "/recipes",
                Some(&token),
                &soup_fields(),
                Some(("soup.png", png.as_slice())),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{recipe}");
        assert_eq!(recipe["ingredient_quantity"], 1.5);
        assert_eq!(recipe["calories"], 50);

        let key = recipe["image_key"].as_str().unwrap().to_string();
        assert!(key.ends_with(".png"));
        assert_eq!(
            app.storage.object(BUCKET, &key),
            Some((png, "image/png".to_string()))
        );

        let (status, body) = app
            .send(empty_request(Method::GET, &recipe_uri(&recipe), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], recipe["id"]);
        assert_eq!(
            body["image_url"],
            format!("{}/{}/{}", IMAGE_BASE_URL, BUCKET, key)
        );
    }

    #[tokio::test]
    async fn test_get_without_image_has_null_url() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let recipe = app.create_soup(&token).await;

        let (status, body) = app
            .send(empty_request(Method::GET, &recipe_uri(&recipe), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["image_url"], Value::Null);
        assert_eq!(body["image_key"], DEFAULT_IMAGE_KEY);
    }

    #[tokio::test]
    async fn test_blank_image_part_means_no_image() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let (status, recipe) = app
            .send(multipart_request(
                Method::POST,
                "/recipes",
                Some(&token),
                &soup_fields(),
                Some(("", b"".as_slice())),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(recipe["image_key"], DEFAULT_IMAGE_KEY);
        assert!(app.storage.operations().is_empty());
    }

    #[tokio::test]
    async fn test_image_gate_rejections() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let png = png_bytes();
        let oversize = vec![0u8; MAX_FILE_SIZE as usize + 1];

        let cases: [(&str, &[u8], &str); 4] = [
            ("soup.gif", png.as_slice(), "Invalid file type"),
            ("soup.PNG", png.as_slice(), "Invalid file type"),
            ("soup.png", oversize.as_slice(), "File size exceeds 5MB"),
            ("soup.jpg", b"definitely not a jpeg".as_slice(), "Image is corrupt"),
        ];

        for (filename, data, message) in cases {
            let (status, body) = app
                .send(multipart_request(
                    Method::POST,
                    "/recipes",
                    Some(&token),
                    &soup_fields(),
                    Some((filename, data)),
                ))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{filename}");
            assert_eq!(body, json!({ "message": message }), "{filename}");
        }

        assert!(app.storage.operations().is_empty());
        assert_eq!(app.repo.recipe_count(), 0);
    }

    #[tokio::test]
    async fn test_body_over_limit_is_file_too_large() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let huge = vec![0u8; crate::api::MAX_BODY_BYTES + 1024];

        let (status, body) = app
            .send(multipart_request(
                Method::POST,
                "/recipes",
                Some(&token),
                &soup_fields(),
                Some(("soup.png", huge.as_slice())),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "File size exceeds 5MB"}));
    }

    #[tokio::test]
    async fn test_multipart_text_in_numeric_field() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let mut fields = soup_fields();
        fields.retain(|(name, _)| *name != "cooktime");
        fields.push(("cooktime", "ten"));

        let (status, body) = app
            .send(multipart_request(
                Method::POST,
                "/recipes",
                Some(&token),
                &fields,
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"cooktime": ["must be of integer type"]}));
    }

    #[tokio::test]
    async fn test_validation_runs_before_image_gate() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let (status, body) = app
            .send(multipart_request(
                Method::POST,
                "/recipes",
                Some(&token),
                &[("title", "Soup")],
                Some(("soup.gif", b"GIF89a".as_slice())),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["unit"], json!(["required field"]));
        assert!(app.storage.operations().is_empty());
    }

    #[tokio::test]
    async fn test_recipes_are_owner_scoped() {
        let app = TestApp::new();
        let alice = app.access_token("alice").await;
        let mallory = app.access_token("mallory").await;
        let recipe = app.create_soup(&alice).await;
        let uri = recipe_uri(&recipe);

        let (status, body) = app.send(empty_request(Method::GET, &uri, Some(&mallory))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Recipe not found"}));

        let (status, _) = app
            .send(json_request(Method::PUT, &uri, Some(&mallory), soup()))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(empty_request(Method::DELETE, &uri, Some(&mallory)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app.send(empty_request(Method::GET, &uri, Some(&alice))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Soup");
    }

    #[tokio::test]
    async fn test_unknown_recipe_is_not_found() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let uri = format!("/recipes/{}", uuid::Uuid::new_v4());

        let (status, _) = app.send(empty_request(Method::GET, &uri, Some(&token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .send(empty_request(Method::DELETE, &uri, Some(&token)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .send(json_request(Method::PUT, &uri, Some(&token), soup()))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_image() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let recipe = app.create_soup(&token).await;
        let uri = recipe_uri(&recipe);

        let payload = json!({
            "title": "Stew",
            "ingredients": "beef",
            "ingredient_quantity": 2,
            "unit": "g",
            "calories": 400,
            "cooktime": 90
        });
        let (status, body) = app
            .send(json_request(Method::PUT, &uri, Some(&token), payload))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], recipe["id"]);
        assert_eq!(body["title"], "Stew");
        assert_eq!(body["unit"], "g");
        assert_eq!(body["cooktime"], 90);
        assert_eq!(body["image_key"], DEFAULT_IMAGE_KEY);
        assert_eq!(body["created_at"], recipe["created_at"]);
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let uri = format!("/recipes/{}", uuid::Uuid::new_v4());
        let (status, body) = app
            .send(json_request(Method::PUT, &uri, Some(&token), json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["title"], json!(["required field"]));
    }

    #[tokio::test]
    async fn test_update_new_image_leaves_old_object() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let png = png_bytes();
        let (_, recipe) = app
            .send(multipart_request(
                Method::POST,
                "/recipes",
                Some(&token),
                &soup_fields(),
                Some(("first.png", png.as_slice())),
            ))
            .await;
        let old_key = recipe["image_key"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(multipart_request(
                Method::PUT,
                &recipe_uri(&recipe),
                Some(&token),
                &soup_fields(),
                Some(("second.png", png.as_slice())),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        let new_key = body["image_key"].as_str().unwrap();
        assert_ne!(new_key, old_key);
        assert!(app.storage.contains(BUCKET, new_key));
        assert!(app.storage.contains(BUCKET, &old_key));
    }

    #[tokio::test]
    async fn test_delete_removes_image_then_row() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let png = png_bytes();
        let (_, recipe) = app
            .send(multipart_request(
                Method::POST,
                "/recipes",
                Some(&token),
                &soup_fields(),
                Some(("soup.jpeg", png.as_slice())),
            ))
            .await;
        let key = recipe["image_key"].as_str().unwrap().to_string();
        let uri = recipe_uri(&recipe);

        let (status, body) = app
            .send(empty_request(Method::DELETE, &uri, Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Recipe deleted"}));
        assert!(!app.storage.contains(BUCKET, &key));
        assert_eq!(
            app.storage.operations().last(),
            Some(&StorageOp::Delete {
                bucket: BUCKET.to_string(),
                key
            })
        );
        assert_eq!(app.repo.recipe_count(), 0);

        let (status, _) = app.send(empty_request(Method::GET, &uri, Some(&token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_without_image_skips_storage() {
        let app = TestApp::new();
        let token = app.access_token("alice").await;
        let recipe = app.create_soup(&token).await;

        let (status, _) = app
            .send(empty_request(Method::DELETE, &recipe_uri(&recipe), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(app.storage.operations().is_empty());
        assert_eq!(app.repo.recipe_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_keeps_row_when_storage_fails() {
        let app = TestApp::with_storage(
            MemoryObjectStore::new(IMAGE_BASE_URL).with_failing_deletes(),
        );
        let token = app.access_token("alice").await;
        let png = png_bytes();
        let (_, recipe) = app
            .send(multipart_request(
                Method::POST,
                "/recipes",
                Some(&token),
                &soup_fields(),
                Some(("soup.png", png.as_slice())),
            ))
            .await;

        let (status, body) = app
            .send(empty_request(Method::DELETE, &recipe_uri(&recipe), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Internal server error"}));
        assert_eq!(app.repo.recipe_count(), 1);
    }

    #[tokio::test]
    async fn test_ping() {
        let app = TestApp::new();
        let (status, body) = app.send(empty_request(Method::GET, "/ping", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "pong"}));
    }
}
