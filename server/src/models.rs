use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub ingredients: String,
    pub ingredient_quantity: f64,
    pub unit: String,
    pub calories: i32,
    pub cooktime: i32,
    pub image_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub ingredients: &'a str,
    pub ingredient_quantity: f64,
    pub unit: &'a str,
    pub calories: i32,
    pub cooktime: i32,
    pub image_key: &'a str,
}

/// Full replacement of a recipe's fields. `image_key: None` keeps the current image.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChanges<'a> {
    pub title: &'a str,
    pub ingredients: &'a str,
    pub ingredient_quantity: f64,
    pub unit: &'a str,
    pub calories: i32,
    pub cooktime: i32,
    pub image_key: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
