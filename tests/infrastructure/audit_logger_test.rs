use std::sync::Arc;

use ai_service::application::ports::MetadataStore;
use ai_service::application::services::AuditLogger;
use ai_service::domain::{CallerId, ConversationId, MessageRole};
use ai_service::infrastructure::persistence::InMemoryMetadataStore;

#[tokio::test]
async fn given_logged_turns_when_reading_conversation_then_turns_round_trip_in_order() {
    let store = Arc::new(InMemoryMetadataStore::new());
    let logger = AuditLogger::new(Arc::clone(&store) as Arc<dyn MetadataStore>);
    let alice = CallerId::new("alice");
    let conversation = ConversationId::new("conv-1");

    let user_turn = logger
        .log_conversation_turn(Some(&alice), &conversation, MessageRole::User, "Hi")
        .await
        .unwrap();
    let assistant_turn = logger
        .log_conversation_turn(Some(&alice), &conversation, MessageRole::Assistant, "Hello")
        .await
        .unwrap();
    logger
        .log_conversation_turn(
            Some(&alice),
            &ConversationId::new("conv-2"),
            MessageRole::User,
            "Elsewhere",
        )
        .await
        .unwrap();

    let turns = logger.conversation_turns(&conversation).await.unwrap();

    assert_eq!(turns, vec![user_turn.clone(), assistant_turn.clone()]);
    assert!(user_turn.timestamp < assistant_turn.timestamp);
}

#[tokio::test]
async fn given_search_query_when_logging_then_entry_expires_after_thirty_days() {
    let store = Arc::new(InMemoryMetadataStore::new());
    let logger = AuditLogger::new(Arc::clone(&store) as Arc<dyn MetadataStore>);

    let entry = logger
        .log_search_query(Some(&CallerId::new("alice")), "refunds", 3)
        .await
        .unwrap();

    assert_eq!(entry.result_count, 3);
    assert_eq!((entry.expires_at() - entry.timestamp).num_days(), 30);

    let items = store
        .query_partition(&format!("SEARCH#{}", entry.search_id))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].str_attr("query"), Some("refunds"));
    assert_eq!(
        items[0].gsi1.as_ref().map(|k| k.partition.as_str()),
        Some("alice")
    );
    assert!(items[0].expires_at.is_some());
}
