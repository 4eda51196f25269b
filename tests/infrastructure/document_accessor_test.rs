use std::sync::Arc;

use object_store::ObjectStore;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use serde_json::{Map, json};

use ai_service::application::ports::{Item, MetadataStore};
use ai_service::application::services::{DocumentAccessor, document_key};
use ai_service::domain::{AccessLevel, DocumentId, StorageKey};
use ai_service::infrastructure::persistence::InMemoryMetadataStore;
use ai_service::infrastructure::storage::ObjectContentStore;

use crate::helpers::put_object;

fn accessor_over(
    metadata: Arc<InMemoryMetadataStore>,
    objects: Arc<dyn ObjectStore>,
) -> DocumentAccessor {
    DocumentAccessor::new(metadata, Arc::new(ObjectContentStore::new(objects)))
}

#[tokio::test]
async fn given_document_without_access_attribute_when_reading_metadata_then_private() {
    let metadata = Arc::new(InMemoryMetadataStore::new());
    let id = DocumentId::new("doc-1");
    let attributes: Map<_, _> = json!({
        "id": "doc-1",
        "userId": "alice",
        "title": "Notes",
        "docType": "note",
        "s3Key": "docs/notes.txt"
    })
    .as_object()
    .unwrap()
    .clone();
    metadata
        .put_item(&Item::new(document_key(&id), attributes))
        .await
        .unwrap();
    let accessor = accessor_over(Arc::clone(&metadata), Arc::new(InMemory::new()));

    let record = accessor.get_metadata(&id).await.unwrap().unwrap();

    assert_eq!(record.owner_user_id, "alice");
    assert_eq!(record.access_level, AccessLevel::Private);
    assert_eq!(record.storage_key.as_str(), "docs/notes.txt");
}

#[tokio::test]
async fn given_unknown_document_when_reading_metadata_then_none() {
    let accessor = accessor_over(
        Arc::new(InMemoryMetadataStore::new()),
        Arc::new(InMemory::new()),
    );

    let record = accessor
        .get_metadata(&DocumentId::new("nope"))
        .await
        .unwrap();

    assert!(record.is_none());
}

#[tokio::test]
async fn given_media_types_when_reading_content_then_text_is_verbatim_and_others_are_placeholders() {
    let memory = Arc::new(InMemory::new());
    put_object(&memory, "a.txt", "text/plain; charset=utf-8", b"hello").await;
    put_object(&memory, "b.json", "application/json", b"{}").await;
    put_object(&memory, "c.pdf", "application/pdf", b"%PDF").await;
    put_object(&memory, "d.png", "image/png", b"\x89PNG").await;
    let accessor = accessor_over(Arc::new(InMemoryMetadataStore::new()), memory);

    assert_eq!(
        accessor.get_content(&StorageKey::new("a.txt")).await.as_deref(),
        Some("hello")
    );
    assert_eq!(
        accessor.get_content(&StorageKey::new("b.json")).await.as_deref(),
        Some("{}")
    );
    assert_eq!(
        accessor.get_content(&StorageKey::new("c.pdf")).await.as_deref(),
        Some("[PDF content from c.pdf]")
    );
    assert_eq!(
        accessor.get_content(&StorageKey::new("d.png")).await.as_deref(),
        Some("[Binary content from d.png]")
    );
}

#[tokio::test]
async fn given_missing_object_when_reading_content_then_none() {
    let accessor = accessor_over(
        Arc::new(InMemoryMetadataStore::new()),
        Arc::new(InMemory::new()),
    );

    assert!(
        accessor
            .get_content(&StorageKey::new("docs/gone.txt"))
            .await
            .is_none()
    );
}

#[tokio::test]
async fn given_local_backend_without_media_type_when_reading_content_then_extension_decides() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.md"), "# Title").unwrap();
    std::fs::write(dir.path().join("scan.pdf"), "%PDF").unwrap();
    let fs = LocalFileSystem::new_with_prefix(dir.path()).unwrap();
    let accessor = accessor_over(Arc::new(InMemoryMetadataStore::new()), Arc::new(fs));

    assert_eq!(
        accessor.get_content(&StorageKey::new("notes.md")).await.as_deref(),
        Some("# Title")
    );
    assert_eq!(
        accessor.get_content(&StorageKey::new("scan.pdf")).await.as_deref(),
        Some("[PDF content from scan.pdf]")
    );
}
