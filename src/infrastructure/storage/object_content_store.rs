use std::sync::Arc;

use async_trait::async_trait;
use object_store::path::Path as StorePath;
use object_store::{Attribute, ObjectStore};
use tracing::instrument;

use crate::application::ports::{ContentStore, ContentStoreError, StoredObject};
use crate::domain::StorageKey;

/// Document content backed by any `object_store` implementation.
pub struct ObjectContentStore {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectContentStore {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ContentStore for ObjectContentStore {
    #[instrument(skip(self), fields(key = %key.as_str()))]
    async fn get_object(&self, key: &StorageKey) -> Result<StoredObject, ContentStoreError> {
        let store_path = StorePath::from(key.as_str());
        let result = self.inner.get(&store_path).await.map_err(|e| match e {
            object_store::Error::NotFound { path, .. } => ContentStoreError::NotFound(path),
            other => ContentStoreError::DownloadFailed(other.to_string()),
        })?;

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| AsRef::<str>::as_ref(value).to_string());

        let body = result
            .bytes()
            .await
            .map_err(|e| ContentStoreError::DownloadFailed(e.to_string()))?;

        Ok(StoredObject { content_type, body })
    }
}
