use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::application::ports::{ContentStore, Item, ItemKey, MetadataStore, MetadataStoreError};
use crate::domain::{AccessLevel, DocumentId, DocumentRecord, MediaKind, StorageKey};

pub const DOCUMENT_PARTITION_PREFIX: &str = "DOC#";
pub const METADATA_SORT_KEY: &str = "METADATA";

pub fn document_key(id: &DocumentId) -> ItemKey {
    ItemKey::new(
        format!("{DOCUMENT_PARTITION_PREFIX}{}", id.as_str()),
        METADATA_SORT_KEY,
    )
}

/// Attribute layout written by the ingestion path.
#[derive(Deserialize)]
struct DocumentAttributes {
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(default)]
    access: Option<AccessLevel>,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "docType")]
    doc_type: String,
    #[serde(rename = "s3Key")]
    s3_key: String,
}

impl TryFrom<&Item> for DocumentRecord {
    type Error = MetadataStoreError;

    fn try_from(item: &Item) -> Result<Self, Self::Error> {
        let attrs: DocumentAttributes =
            serde_json::from_value(Value::Object(item.attributes.clone()))
                .map_err(|e| MetadataStoreError::MalformedItem(e.to_string()))?;

        Ok(DocumentRecord {
            id: DocumentId::new(attrs.id),
            owner_user_id: attrs.user_id,
            access_level: attrs.access.unwrap_or_default(),
            title: attrs.title,
            doc_type: attrs.doc_type,
            storage_key: StorageKey::new(attrs.s3_key),
        })
    }
}

pub struct DocumentAccessor {
    metadata_store: Arc<dyn MetadataStore>,
    content_store: Arc<dyn ContentStore>,
}

impl DocumentAccessor {
    pub fn new(metadata_store: Arc<dyn MetadataStore>, content_store: Arc<dyn ContentStore>) -> Self {
        Self {
            metadata_store,
            content_store,
        }
    }

    /// `Ok(None)` means the document does not exist.
    #[instrument(skip(self), fields(document_id = %id))]
    pub async fn get_metadata(
        &self,
        id: &DocumentId,
    ) -> Result<Option<DocumentRecord>, MetadataStoreError> {
        self.metadata_store
            .get_item(&document_key(id))
            .await?
            .as_ref()
            .map(DocumentRecord::try_from)
            .transpose()
    }

    /// Fetch faults are logged and reported as `None`.
    #[instrument(skip(self), fields(storage_key = %key))]
    pub async fn get_content(&self, key: &StorageKey) -> Option<String> {
        let object = match self.content_store.get_object(key).await {
            Ok(object) => object,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch document content");
                return None;
            }
        };

        let kind = match object.content_type.as_deref() {
            Some(media_type) => MediaKind::from_media_type(media_type),
            None => key
                .extension()
                .map(MediaKind::from_extension)
                .unwrap_or(MediaKind::Binary),
        };

        match kind {
            MediaKind::Text => match String::from_utf8(object.body.to_vec()) {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::error!(error = %e, "Document declared as text is not valid UTF-8");
                    None
                }
            },
            MediaKind::Pdf => Some(format!("[PDF content from {key}]")),
            MediaKind::Binary => Some(format!("[Binary content from {key}]")),
        }
    }
}
