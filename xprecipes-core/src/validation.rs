//! Field schemas for recipe and credential submissions.
//!
//! A submission is a JSON object (or a multipart form converted to one). It is
//! checked against a list of [`FieldRule`]s and either produces a typed value
//! or a [`ValidationErrors`] mapping each offending field to its messages.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::sanitize::clean;
use crate::unit::{Unit, UNIT_NAMES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text {
        min_len: usize,
        max_len: usize,
        allow_empty: bool,
        allowed: Option<&'static [&'static str]>,
    },
    Float,
    Integer,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

pub const RECIPE_SCHEMA: &[FieldRule] = &[
    FieldRule {
        name: "title",
        kind: FieldKind::Text {
            min_len: 3,
            max_len: 100,
            allow_empty: true,
            allowed: None,
        },
        required: true,
    },
    FieldRule {
        name: "ingredients",
        kind: FieldKind::Text {
            min_len: 1,
            max_len: 100,
            allow_empty: true,
            allowed: None,
        },
        required: true,
    },
    FieldRule {
        name: "ingredient_quantity",
        kind: FieldKind::Float,
        required: true,
    },
    FieldRule {
        name: "unit",
        kind: FieldKind::Text {
            min_len: 0,
            max_len: usize::MAX,
            allow_empty: true,
            allowed: Some(UNIT_NAMES),
        },
        required: true,
    },
    FieldRule {
        name: "calories",
        kind: FieldKind::Integer,
        required: true,
    },
    FieldRule {
        name: "cooktime",
        kind: FieldKind::Integer,
        required: true,
    },
    FieldRule {
        name: "image",
        kind: FieldKind::File,
        required: false,
    },
];

pub const CREDENTIALS_SCHEMA: &[FieldRule] = &[
    FieldRule {
        name: "username",
        kind: FieldKind::Text {
            min_len: 1,
            max_len: 255,
            allow_empty: false,
            allowed: None,
        },
        required: true,
    },
    FieldRule {
        name: "password",
        kind: FieldKind::Text {
            min_len: 1,
            max_len: usize::MAX,
            allow_empty: false,
            allowed: None,
        },
        required: true,
    },
];

/// Per-field violation messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check `payload` against `schema`. An empty result means the payload is valid.
///
/// Only the first failing check is reported for each field. Keys that the
/// schema does not name are reported as `unknown field`.
pub fn validate(schema: &[FieldRule], payload: &Map<String, Value>) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    for key in payload.keys() {
        if !schema.iter().any(|rule| rule.name == key) {
            errors.add(key.as_str(), "unknown field");
        }
    }

    for rule in schema {
        match payload.get(rule.name) {
            None if rule.required => errors.add(rule.name, "required field"),
            None => {}
            Some(value) => {
                if let Err(message) = check_value(rule.kind, value) {
                    errors.add(rule.name, message);
                }
            }
        }
    }

    errors
}

fn check_value(kind: FieldKind, value: &Value) -> Result<(), String> {
    if value.is_null() {
        return Err("null value not allowed".to_string());
    }

    match kind {
        FieldKind::Text {
            min_len,
            max_len,
            allow_empty,
            allowed,
        } => {
            let Value::String(text) = value else {
                return Err("must be of string type".to_string());
            };
            if text.is_empty() && !allow_empty {
                return Err("empty values not allowed".to_string());
            }
            check_length(text, min_len, max_len)?;
            if let Some(allowed) = allowed {
                if !allowed.contains(&text.as_str()) {
                    return Err(format!("unallowed value {}", text));
                }
            }
            Ok(())
        }
        FieldKind::Float => match value {
            Value::Number(_) => Ok(()),
            _ => Err("must be of float type".to_string()),
        },
        FieldKind::Integer => match value.as_i64() {
            Some(n) if i32::try_from(n).is_ok() => Ok(()),
            Some(_) => Err("integer out of range".to_string()),
            None => Err("must be of integer type".to_string()),
        },
        // A JSON value can never carry an upload; files only arrive as multipart parts.
        FieldKind::File => Err("must be of file type".to_string()),
    }
}

fn check_length(text: &str, min_len: usize, max_len: usize) -> Result<(), String> {
    let len = text.chars().count();
    if len < min_len {
        return Err(format!("min length is {}", min_len));
    }
    if len > max_len {
        return Err(format!("max length is {}", max_len));
    }
    Ok(())
}

/// Re-apply the length bounds of a [`RECIPE_SCHEMA`] text field to `text`.
fn check_recipe_text(errors: &mut ValidationErrors, field: &'static str, text: &str) {
    let bounds = RECIPE_SCHEMA
        .iter()
        .find(|rule| rule.name == field)
        .and_then(|rule| match rule.kind {
            FieldKind::Text {
                min_len, max_len, ..
            } => Some((min_len, max_len)),
            _ => None,
        });
    if let Some((min_len, max_len)) = bounds {
        if let Err(message) = check_length(text, min_len, max_len) {
            errors.add(field, message);
        }
    }
}

/// Convert a multipart text part into the JSON value the schema expects.
///
/// Numeric fields are parsed when they look like numbers; anything that does
/// not parse stays a string so the type check reports it.
pub fn coerce_form_value(field: &str, raw: String) -> Value {
    let kind = RECIPE_SCHEMA
        .iter()
        .find(|rule| rule.name == field)
        .map(|rule| rule.kind);

    match kind {
        Some(FieldKind::Float) => match raw.trim().parse::<f64>().ok().and_then(Number::from_f64) {
            Some(number) => Value::Number(number),
            None => Value::String(raw),
        },
        Some(FieldKind::Integer) => match raw.trim().parse::<i64>() {
            Ok(number) => Value::from(number),
            Err(_) => Value::String(raw),
        },
        _ => Value::String(raw),
    }
}

/// A recipe submission that passed [`RECIPE_SCHEMA`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSubmission {
    pub title: String,
    pub ingredients: String,
    pub ingredient_quantity: f64,
    pub unit: Unit,
    pub calories: i32,
    /// Minutes.
    pub cooktime: i32,
}

impl RecipeSubmission {
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let errors = validate(RECIPE_SCHEMA, payload);
        if !errors.is_empty() {
            return Err(errors);
        }
        // Presence and types were established by validate() above.
        Self::extract(payload).ok_or(errors)
    }

    fn extract(payload: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            title: text_field(payload, "title")?,
            ingredients: text_field(payload, "ingredients")?,
            ingredient_quantity: payload.get("ingredient_quantity")?.as_f64()?,
            unit: payload.get("unit")?.as_str()?.parse().ok()?,
            calories: int_field(payload, "calories")?,
            cooktime: int_field(payload, "cooktime")?,
        })
    }

    /// Strip markup from the free-text fields.
    ///
    /// The length bounds are checked again on the cleaned text, since that is
    /// what gets stored: `<b></b>` passes as input but cleans to nothing.
    /// `unit` is already one of a fixed set of plain words.
    pub fn sanitized(self) -> Result<Self, ValidationErrors> {
        let title = clean(&self.title);
        let ingredients = clean(&self.ingredients);

        let mut errors = ValidationErrors::default();
        check_recipe_text(&mut errors, "title", &title);
        check_recipe_text(&mut errors, "ingredients", &ingredients);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            title,
            ingredients,
            ..self
        })
    }
}

/// Username and password from a register or login request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let errors = validate(CREDENTIALS_SCHEMA, payload);
        if !errors.is_empty() {
            return Err(errors);
        }
        let credentials = text_field(payload, "username").zip(text_field(payload, "password"));
        credentials
            .map(|(username, password)| Self { username, password })
            .ok_or(errors)
    }
}

fn text_field(payload: &Map<String, Value>, name: &str) -> Option<String> {
    payload.get(name)?.as_str().map(str::to_string)
}

fn int_field(payload: &Map<String, Value>, name: &str) -> Option<i32> {
    i32::try_from(payload.get(name)?.as_i64()?).ok()
}
