use std::sync::Arc;

use object_store::ObjectStore;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;

use ai_service::application::ports::{ContentStore, ContentStoreError};
use ai_service::domain::StorageKey;
use ai_service::infrastructure::storage::ObjectContentStore;

use crate::helpers::put_object;

#[tokio::test]
async fn given_object_with_content_type_when_fetching_then_type_and_body_are_returned() {
    let memory = Arc::new(InMemory::new());
    put_object(&memory, "docs/a.json", "application/json", br#"{"a":1}"#).await;
    let store = ObjectContentStore::new(memory as Arc<dyn ObjectStore>);

    let object = store
        .get_object(&StorageKey::new("docs/a.json"))
        .await
        .unwrap();

    assert_eq!(object.content_type.as_deref(), Some("application/json"));
    assert_eq!(&object.body[..], br#"{"a":1}"#);
}

#[tokio::test]
async fn given_missing_key_when_fetching_then_not_found() {
    let store = ObjectContentStore::new(Arc::new(InMemory::new()));

    let err = store
        .get_object(&StorageKey::new("docs/missing.txt"))
        .await
        .unwrap_err();

    assert!(matches!(err, ContentStoreError::NotFound(_)));
}

#[tokio::test]
async fn given_local_filesystem_when_fetching_then_body_is_read_without_content_type() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/notes.txt"), "plain notes").unwrap();
    let fs = LocalFileSystem::new_with_prefix(dir.path()).unwrap();
    let store = ObjectContentStore::new(Arc::new(fs));

    let object = store
        .get_object(&StorageKey::new("docs/notes.txt"))
        .await
        .unwrap();

    assert_eq!(object.content_type, None);
    assert_eq!(&object.body[..], b"plain notes");
}
