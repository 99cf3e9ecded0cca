//! Runtime configuration, read from environment variables at startup.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_IMAGE_BUCKET: &str = "xprecipes-images";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {var} value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    S3 {
        endpoint: Option<String>,
        timeout: Duration,
        url_expiry: Duration,
    },
    /// Process-local object store for development; images vanish on restart.
    Memory { base_url: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory repository.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub image_bucket: String,
    pub storage: StorageConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("image_bucket", &self.image_bucket)
            .field("storage", &self.storage)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let storage = match lookup("STORAGE_BACKEND").as_deref() {
            None | Some("s3") => StorageConfig::S3 {
                endpoint: lookup("S3_ENDPOINT").filter(|e| !e.is_empty()),
                timeout: seconds(&lookup, "STORAGE_TIMEOUT_SECS", 5)?,
                url_expiry: seconds(&lookup, "IMAGE_URL_EXPIRY_SECS", 3600)?,
            },
            Some("memory") => StorageConfig::Memory {
                base_url: lookup("MEMORY_STORAGE_BASE_URL")
                    .unwrap_or_else(|| "http://localhost:3000/images".to_string()),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "STORAGE_BACKEND",
                    value: other.to_string(),
                    reason: "expected \"s3\" or \"memory\"".to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr: parsed(&lookup, "BIND_ADDR", "0.0.0.0:3000")?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_secret,
            access_token_ttl: seconds(&lookup, "ACCESS_TOKEN_TTL_SECS", 15 * 60)?,
            refresh_token_ttl: seconds(&lookup, "REFRESH_TOKEN_TTL_SECS", 30 * 24 * 60 * 60)?,
            image_bucket: lookup("IMAGE_BUCKET")
                .filter(|bucket| !bucket.is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_BUCKET.to_string()),
            storage,
        })
    }
}

fn parsed<F, T>(lookup: &F, var: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

fn seconds<F>(lookup: &F, var: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: u64 = parsed(lookup, var, &default.to_string())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: secs.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
