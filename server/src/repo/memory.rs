use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;
use xprecipes_core::RecipeSubmission;

use super::{RecipeRepository, RepoError, UserRepository};
use crate::models::{Recipe, User};

/// In-process repository. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    /// Keyed by username, which is what enforces uniqueness.
    users: DashMap<String, User>,
    recipes: DashMap<Uuid, Recipe>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepoError> {
        match self.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(RepoError::DuplicateUsername),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.get(username).map(|user| user.clone()))
    }
}

#[async_trait]
impl RecipeRepository for MemoryRepository {
    async fn insert(
        &self,
        owner: Uuid,
        submission: &RecipeSubmission,
        image_key: &str,
    ) -> Result<Recipe, RepoError> {
        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            user_id: owner,
            title: submission.title.clone(),
            ingredients: submission.ingredients.clone(),
            ingredient_quantity: submission.ingredient_quantity,
            unit: submission.unit.as_str().to_string(),
            calories: submission.calories,
            cooktime: submission.cooktime,
            image_key: image_key.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Recipe>, RepoError> {
        Ok(self
            .recipes
            .get(&id)
            .filter(|recipe| recipe.user_id == owner)
            .map(|recipe| recipe.clone()))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        submission: &RecipeSubmission,
        new_image_key: Option<&str>,
    ) -> Result<Option<Recipe>, RepoError> {
        let Some(mut recipe) = self.recipes.get_mut(&id) else {
            return Ok(None);
        };
        if recipe.user_id != owner {
            return Ok(None);
        }

        recipe.title = submission.title.clone();
        recipe.ingredients = submission.ingredients.clone();
        recipe.ingredient_quantity = submission.ingredient_quantity;
        recipe.unit = submission.unit.as_str().to_string();
        recipe.calories = submission.calories;
        recipe.cooktime = submission.cooktime;
        if let Some(key) = new_image_key {
            recipe.image_key = key.to_string();
        }
        recipe.updated_at = Utc::now();

        Ok(Some(recipe.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .recipes
            .remove_if(&id, |_, recipe| recipe.user_id == owner)
            .is_some())
    }
}
