use std::path::PathBuf;
use std::sync::Arc;

use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;

use crate::application::ports::{ContentStore, ContentStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::object_content_store::ObjectContentStore;

pub struct ContentStoreFactory;

impl ContentStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn ContentStore>, ContentStoreError> {
        let inner: Arc<dyn ObjectStore> = match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                std::fs::create_dir_all(&path)
                    .map_err(|e| ContentStoreError::Configuration(e.to_string()))?;
                let fs = LocalFileSystem::new_with_prefix(path)
                    .map_err(|e| ContentStoreError::Configuration(e.to_string()))?;
                Arc::new(fs)
            }
            StorageProviderSetting::S3 => {
                let bucket = settings.bucket.as_deref().ok_or_else(|| {
                    ContentStoreError::Configuration("storage.bucket required".into())
                })?;
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(region) = settings.region.as_deref() {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = settings.endpoint.as_deref() {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }
                let s3 = builder
                    .build()
                    .map_err(|e| ContentStoreError::Configuration(e.to_string()))?;
                Arc::new(s3)
            }
            StorageProviderSetting::Memory => Arc::new(InMemory::new()),
        };

        Ok(Arc::new(ObjectContentStore::new(inner)))
    }
}
