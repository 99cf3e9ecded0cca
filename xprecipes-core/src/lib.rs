//! Request-independent recipe logic shared by the xprecipes server.
//!
//! Everything in here is pure: field validation, text sanitizing and the
//! image gate that decides whether an upload may be stored.

pub mod error;
pub mod image;
pub mod sanitize;
pub mod unit;
pub mod validation;

pub use error::{ImageError, UnknownUnit};
pub use image::{
    accept_image, AcceptedImage, ImageUpload, ALLOWED_EXTENSIONS, DEFAULT_IMAGE_KEY,
    MAX_FILE_SIZE,
};
pub use sanitize::clean;
pub use unit::Unit;
pub use validation::{
    coerce_form_value, Credentials, FieldKind, FieldRule, RecipeSubmission, ValidationErrors,
    CREDENTIALS_SCHEMA, RECIPE_SCHEMA,
};
