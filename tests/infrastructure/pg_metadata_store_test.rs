use chrono::{Duration, Utc};
use serde_json::{Map, json};

use ai_service::application::ports::{Item, ItemKey, MetadataStore};

use crate::helpers::TestPostgres;

fn item(partition: &str, sort: &str, message: &str) -> Item {
    let mut attributes = Map::new();
    attributes.insert("message".to_string(), json!(message));
    Item::new(ItemKey::new(partition, sort), attributes)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_postgres_container_when_putting_and_getting_then_item_round_trips() {
    let pg = TestPostgres::new().await;
    let stored = item("ANALYSIS#1", "METADATA", "summary")
        .with_gsi1(ItemKey::new("alice", "2024-01-01T00:00:00.000000Z"))
        .with_gsi2(ItemKey::new("DOC#1", "2024-01-01T00:00:00.000000Z"));

    pg.store.put_item(&stored).await.unwrap();
    let fetched = pg.store.get_item(&stored.key).await.unwrap().unwrap();

    assert_eq!(fetched.key, stored.key);
    assert_eq!(fetched.gsi1, stored.gsi1);
    assert_eq!(fetched.gsi2, stored.gsi2);
    assert_eq!(fetched.str_attr("message"), Some("summary"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_same_key_twice_when_putting_then_second_write_replaces_first() {
    let pg = TestPostgres::new().await;

    pg.store.put_item(&item("DOC#1", "METADATA", "v1")).await.unwrap();
    pg.store.put_item(&item("DOC#1", "METADATA", "v2")).await.unwrap();

    let fetched = pg
        .store
        .get_item(&ItemKey::new("DOC#1", "METADATA"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.str_attr("message"), Some("v2"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_partition_with_expired_item_when_querying_then_live_items_in_sort_order() {
    let pg = TestPostgres::new().await;
    pg.store.put_item(&item("CONV#1", "MSG#2", "second")).await.unwrap();
    pg.store.put_item(&item("CONV#1", "MSG#1", "first")).await.unwrap();
    pg.store
        .put_item(&item("CONV#1", "MSG#0", "stale").with_expiry(Utc::now() - Duration::hours(1)))
        .await
        .unwrap();
    pg.store.put_item(&item("CONV#2", "MSG#1", "other")).await.unwrap();

    let items = pg.store.query_partition("CONV#1").await.unwrap();

    let messages: Vec<_> = items.iter().filter_map(|i| i.str_attr("message")).collect();
    assert_eq!(messages, vec!["first", "second"]);

    let purged = pg.store.purge_expired().await.unwrap();
    assert_eq!(purged, 1);
}
