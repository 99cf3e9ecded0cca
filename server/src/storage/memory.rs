use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{ObjectStore, StorageError};

/// One call made against a [`MemoryObjectStore`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Upload { bucket: String, key: String },
    Delete { bucket: String, key: String },
}

/// Only read back by tests.
#[derive(Debug, Clone)]
#[cfg_attr(not(test), allow(dead_code))]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// Object store held in process memory, used for local development and tests.
#[derive(Debug)]
pub struct MemoryObjectStore {
    base_url: String,
    objects: DashMap<(String, String), StoredObject>,
    ops: Mutex<Vec<StorageOp>>,
    fail_deletes: bool,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: DashMap::new(),
            ops: Mutex::new(Vec::new()),
            fail_deletes: false,
        }
    }

    /// Make every delete fail, to exercise error paths.
    #[cfg(test)]
    pub fn with_failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    #[cfg(test)]
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Stored bytes and content type for an object.
    #[cfg(test)]
    pub fn object(&self, bucket: &str, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| (object.data.clone(), object.content_type.clone()))
    }

    #[cfg(test)]
    pub fn operations(&self) -> Vec<StorageOp> {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, op: StorageOp) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.record(StorageOp::Upload {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.record(StorageOp::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if self.fail_deletes {
            return Err(StorageError::RequestFailed(format!(
                "delete of {}/{} refused",
                bucket, key
            )));
        }
        self.objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn url_for(&self, bucket: &str, key: &str) -> Result<String, StorageError> {
        Ok(format!("{}/{}/{}", self.base_url, bucket, key))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
