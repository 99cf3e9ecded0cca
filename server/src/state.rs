use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::{Config, StorageConfig};
use crate::db;
use crate::repo::{MemoryRepository, PgRepository, RecipeRepository, UserRepository};
use crate::storage::{MemoryObjectStore, ObjectStore, S3ObjectStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub storage: Arc<dyn ObjectStore>,
    pub tokens: Arc<TokenService>,
    pub image_bucket: Arc<str>,
}

impl AppState {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (users, recipes): (Arc<dyn UserRepository>, Arc<dyn RecipeRepository>) =
            match &config.database_url {
                Some(url) => {
                    let url = url.clone();
                    let pool = tokio::task::spawn_blocking(move || db::create_pool(&url)).await??;
                    let repo = Arc::new(PgRepository::new(pool));
                    (repo.clone(), repo)
                }
                None => {
                    tracing::warn!("DATABASE_URL not set, keeping users and recipes in memory");
                    let repo = Arc::new(MemoryRepository::new());
                    (repo.clone(), repo)
                }
            };

        let storage: Arc<dyn ObjectStore> = match &config.storage {
            StorageConfig::S3 {
                endpoint,
                timeout,
                url_expiry,
            } => Arc::new(S3ObjectStore::connect(endpoint.as_deref(), *timeout, *url_expiry).await),
            StorageConfig::Memory { base_url } => Arc::new(MemoryObjectStore::new(base_url.clone())),
        };
        tracing::info!(
            backend = storage.backend_name(),
            bucket = %config.image_bucket,
            "image storage ready"
        );

        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            config.access_token_ttl,
            config.refresh_token_ttl,
        );

        Ok(Self {
            users,
            recipes,
            storage,
            tokens: Arc::new(tokens),
            image_bucket: Arc::from(config.image_bucket.as_str()),
        })
    }
}
