use crate::api::{ApiError, JsonObject};
use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header, StatusCode},
};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;
use xprecipes_core::{coerce_form_value, ImageError, ImageUpload};

/// Name of the multipart part carrying the image file.
const IMAGE_FIELD: &str = "image";

/// JSON form of a recipe submission (no image).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RecipeRequest {
    pub title: String,
    pub ingredients: String,
    pub ingredient_quantity: f64,
    #[schema(example = "tsp")]
    pub unit: String,
    pub calories: i32,
    /// Minutes.
    pub cooktime: i32,
}

/// Multipart form of a recipe submission, with an optional image part.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RecipeMultipartRequest {
    pub title: String,
    pub ingredients: String,
    pub ingredient_quantity: f64,
    pub unit: String,
    pub calories: i32,
    pub cooktime: i32,
    /// jpg, jpeg or png, at most 5MB.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Raw recipe submission: the fields still to be validated, plus the image file if one was sent.
///
/// Accepts `application/json` or `multipart/form-data`. Multipart text parts
/// are converted to JSON values so both encodings go through the same schema.
#[derive(Debug)]
pub struct RecipeForm {
    pub fields: Map<String, Value>,
    pub image: Option<ImageUpload>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn multipart_error(err: MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::Image(ImageError::FileTooLarge)
    } else {
        ApiError::BadRequest(format!("Failed to read multipart data: {}", err.body_text()))
    }
}

impl<S> FromRequest<S> for RecipeForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let JsonObject(fields) = JsonObject::from_request(req, state).await?;
            return Ok(RecipeForm {
                fields,
                image: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        let mut fields = Map::new();
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let data = field.bytes().await.map_err(multipart_error)?;
                    if name == IMAGE_FIELD {
                        // Browsers send an empty part when the file input is left blank.
                        if filename.is_empty() && data.is_empty() {
                            continue;
                        }
                        image = Some(ImageUpload::new(filename, data.to_vec()));
                    } else {
                        // A file where text was expected; let the schema report it.
                        fields.insert(name, json!({ "filename": filename }));
                    }
                }
                None => {
                    let text = field.text().await.map_err(multipart_error)?;
                    let value = coerce_form_value(&name, text);
                    fields.insert(name, value);
                }
            }
        }

        Ok(RecipeForm { fields, image })
    }
}
