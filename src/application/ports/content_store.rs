use bytes::Bytes;

use crate::domain::StorageKey;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_object(&self, key: &StorageKey) -> Result<StoredObject, ContentStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
