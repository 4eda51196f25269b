use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Composite partition + sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub partition: String,
    pub sort: String,
}

impl ItemKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

/// A stored record: primary key, up to two secondary index keys, attributes
/// and an optional expiry after which reads no longer see it.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub key: ItemKey,
    pub gsi1: Option<ItemKey>,
    pub gsi2: Option<ItemKey>,
    pub attributes: Map<String, Value>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(key: ItemKey, attributes: Map<String, Value>) -> Self {
        Self {
            key,
            gsi1: None,
            gsi2: None,
            attributes,
            expires_at: None,
        }
    }

    pub fn with_gsi1(mut self, key: ItemKey) -> Self {
        self.gsi1 = Some(key);
        self
    }

    pub fn with_gsi2(mut self, key: ItemKey) -> Self {
        self.gsi2 = Some(key);
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }
}

#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_item(&self, key: &ItemKey) -> Result<Option<Item>, MetadataStoreError>;

    /// Inserts or replaces the item stored under `item.key`.
    async fn put_item(&self, item: &Item) -> Result<(), MetadataStoreError>;

    /// Live items of one partition ordered by sort key.
    async fn query_partition(&self, partition: &str) -> Result<Vec<Item>, MetadataStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataStoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("malformed item: {0}")]
    MalformedItem(String),
    #[error("migration failed: {0}")]
    MigrationFailed(String),
}
