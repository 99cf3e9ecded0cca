use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;
use xprecipes_core::RecipeSubmission;

use super::{RecipeRepository, RepoError, UserRepository};
use crate::db::DbPool;
use crate::models::{NewRecipe, NewUser, Recipe, RecipeChanges, User};
use crate::schema::{recipes, users};

/// Postgres-backed repository. Diesel calls are synchronous and run on the
/// request task.
#[derive(Clone)]
pub struct PgRepository {
    pool: DbPool,
}

impl PgRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, RepoError> {
        self.pool
            .get()
            .map_err(|e| RepoError::Connection(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepoError> {
        let mut conn = self.conn()?;

        let new_user = NewUser {
            username,
            password_hash,
        };

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    RepoError::DuplicateUsername
                }
                other => RepoError::Query(other),
            })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(user)
    }
}

#[async_trait]
impl RecipeRepository for PgRepository {
    async fn insert(
        &self,
        owner: Uuid,
        submission: &RecipeSubmission,
        image_key: &str,
    ) -> Result<Recipe, RepoError> {
        let mut conn = self.conn()?;

        let new_recipe = NewRecipe {
            user_id: owner,
            title: &submission.title,
            ingredients: &submission.ingredients,
            ingredient_quantity: submission.ingredient_quantity,
            unit: submission.unit.as_str(),
            calories: submission.calories,
            cooktime: submission.cooktime,
            image_key,
        };

        let recipe = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(Recipe::as_returning())
            .get_result(&mut conn)?;

        Ok(recipe)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Recipe>, RepoError> {
        let mut conn = self.conn()?;

        let recipe = recipes::table
            .filter(recipes::id.eq(id))
            .filter(recipes::user_id.eq(owner))
            .select(Recipe::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(recipe)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        submission: &RecipeSubmission,
        new_image_key: Option<&str>,
    ) -> Result<Option<Recipe>, RepoError> {
        let mut conn = self.conn()?;

        let changes = RecipeChanges {
            title: &submission.title,
            ingredients: &submission.ingredients,
            ingredient_quantity: submission.ingredient_quantity,
            unit: submission.unit.as_str(),
            calories: submission.calories,
            cooktime: submission.cooktime,
            image_key: new_image_key,
            updated_at: Utc::now(),
        };

        let recipe = diesel::update(
            recipes::table
                .filter(recipes::id.eq(id))
                .filter(recipes::user_id.eq(owner)),
        )
        .set(&changes)
        .returning(Recipe::as_returning())
        .get_result(&mut conn)
        .optional()?;

        Ok(recipe)
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, RepoError> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id))
                .filter(recipes::user_id.eq(owner)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
