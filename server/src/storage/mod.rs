//! Object storage for recipe images.

mod memory;
mod s3;

pub use memory::MemoryObjectStore;
#[cfg(test)]
pub use memory::StorageOp;
pub use s3::S3ObjectStore;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object storage request failed: {0}")]
    RequestFailed(String),

    #[error("could not build presigned url: {0}")]
    Presign(String),
}

/// Minimal object-store contract: put, delete and a retrieval URL.
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    /// URL a client can fetch the object from.
    async fn url_for(&self, bucket: &str, key: &str) -> Result<String, StorageError>;

    /// Backend name for logs (e.g., "s3", "memory").
    fn backend_name(&self) -> &'static str;
}
