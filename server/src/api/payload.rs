use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::{Map, Value};

use super::ApiError;

/// A JSON request body that must be an object. Field-level checking happens
/// afterwards against a schema, so the shape is left open here.
#[derive(Debug)]
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        match value {
            Value::Object(map) => Ok(JsonObject(map)),
            _ => Err(ApiError::BadRequest(
                "request body must be a JSON object".to_string(),
            )),
        }
    }
}
