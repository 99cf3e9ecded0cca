//! Persistence for users and recipes.
//!
//! Handlers only see the repository traits. [`PgRepository`] is the real
//! backend; [`MemoryRepository`] keeps everything in process for local runs
//! without a database and for tests.

mod memory;
mod pg;

pub use memory::MemoryRepository;
pub use pg::PgRepository;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;
use xprecipes_core::RecipeSubmission;

use crate::models::{Recipe, User};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Fails with [`RepoError::DuplicateUsername`] if the name is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Recipe rows, always scoped to the owning user.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn insert(
        &self,
        owner: Uuid,
        submission: &RecipeSubmission,
        image_key: &str,
    ) -> Result<Recipe, RepoError>;

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Recipe>, RepoError>;

    /// Replace every field of the recipe; the image key only when `new_image_key` is set.
    /// Returns `None` if `owner` has no recipe `id`.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        submission: &RecipeSubmission,
        new_image_key: Option<&str>,
    ) -> Result<Option<Recipe>, RepoError>;

    /// Returns whether a row was removed.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, RepoError>;
}
