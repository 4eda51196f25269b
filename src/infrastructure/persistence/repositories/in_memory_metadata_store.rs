use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{Item, ItemKey, MetadataStore, MetadataStoreError};

/// Process-local metadata store for development and tests.
#[derive(Default)]
pub struct InMemoryMetadataStore {
    items: RwLock<BTreeMap<ItemKey, Item>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn get_item(&self, key: &ItemKey) -> Result<Option<Item>, MetadataStoreError> {
        let now = Utc::now();
        Ok(self
            .items
            .read()
            .await
            .get(key)
            .filter(|item| !item.is_expired(now))
            .cloned())
    }

    async fn put_item(&self, item: &Item) -> Result<(), MetadataStoreError> {
        self.items
            .write()
            .await
            .insert(item.key.clone(), item.clone());
        Ok(())
    }

    async fn query_partition(&self, partition: &str) -> Result<Vec<Item>, MetadataStoreError> {
        let now = Utc::now();
        let items = self.items.read().await;
        Ok(items
            .range(ItemKey::new(partition, "")..)
            .take_while(|(key, _)| key.partition == partition)
            .map(|(_, item)| item)
            .filter(|item| !item.is_expired(now))
            .cloned()
            .collect())
    }
}
