use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{Item, ItemKey, MetadataStore, MetadataStoreError};
use crate::domain::{
    AnalysisId, AnalysisKind, AnalysisRecord, CallerId, ConversationId, ConversationTurn,
    DocumentId, InferenceResult, MessageId, MessageRole, SearchLogEntry,
};

use super::document_accessor::{DOCUMENT_PARTITION_PREFIX, METADATA_SORT_KEY};

const CONVERSATION_PARTITION_PREFIX: &str = "CONV#";
const MESSAGE_SORT_PREFIX: &str = "MSG#";
const SEARCH_PARTITION_PREFIX: &str = "SEARCH#";
const ANALYSIS_PARTITION_PREFIX: &str = "ANALYSIS#";

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn conversation_partition(id: &ConversationId) -> String {
    format!("{CONVERSATION_PARTITION_PREFIX}{}", id.as_str())
}

/// Hands out strictly increasing microsecond timestamps so that turns logged
/// back to back never share a sort-key prefix.
#[derive(Default)]
struct TurnClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl TurnClock {
    fn now(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let now = now - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos() % 1_000));
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}

/// Appends audit records to the metadata store.
///
/// Every operation returns the written record or the store error; callers
/// decide whether a failed write matters.
pub struct AuditLogger {
    store: Arc<dyn MetadataStore>,
    clock: TurnClock,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self {
            store,
            clock: TurnClock::default(),
        }
    }

    #[instrument(skip(self, content), fields(conversation_id = %conversation_id, role = %role))]
    pub async fn log_conversation_turn(
        &self,
        user_id: Option<&CallerId>,
        conversation_id: &ConversationId,
        role: MessageRole,
        content: &str,
    ) -> Result<ConversationTurn, MetadataStoreError> {
        let turn = ConversationTurn::new(
            conversation_id.clone(),
            user_id.cloned(),
            role,
            content.to_string(),
            self.clock.now(),
        );
        self.store.put_item(&turn_item(&turn)).await?;
        Ok(turn)
    }

    #[instrument(skip(self, query))]
    pub async fn log_search_query(
        &self,
        user_id: Option<&CallerId>,
        query: &str,
        result_count: usize,
    ) -> Result<SearchLogEntry, MetadataStoreError> {
        let entry = SearchLogEntry::new(user_id.cloned(), query.to_string(), result_count);
        let timestamp = format_timestamp(entry.timestamp);

        let attributes = attributes(json!({
            "id": entry.search_id.to_string(),
            "userId": entry.user_id.as_ref().map(CallerId::as_str),
            "query": entry.query,
            "resultCount": entry.result_count,
            "timestamp": timestamp,
            "ttl": entry.expires_at().timestamp(),
        }));

        let mut item = Item::new(
            ItemKey::new(
                format!("{SEARCH_PARTITION_PREFIX}{}", entry.search_id),
                METADATA_SORT_KEY,
            ),
            attributes,
        )
        .with_expiry(entry.expires_at());
        if let Some(user) = &entry.user_id {
            item = item.with_gsi1(ItemKey::new(user.as_str(), timestamp));
        }

        self.store.put_item(&item).await?;
        Ok(entry)
    }

    #[instrument(skip(self, result), fields(analysis_id = %analysis_id, document_id = %document_id))]
    pub async fn log_analysis_result(
        &self,
        user_id: Option<&CallerId>,
        document_id: &DocumentId,
        analysis_id: AnalysisId,
        kind: AnalysisKind,
        result: &InferenceResult,
    ) -> Result<AnalysisRecord, MetadataStoreError> {
        let record = AnalysisRecord {
            analysis_id,
            document_id: document_id.clone(),
            user_id: user_id.cloned(),
            analysis_kind: kind,
            result_text: result.text.clone(),
            created_at: Utc::now(),
            model_identifier: result.model_identifier.clone(),
            usage: result.usage,
        };
        let created_at = format_timestamp(record.created_at);

        let attributes = attributes(json!({
            "id": record.analysis_id.to_string(),
            "documentId": record.document_id.as_str(),
            "userId": record.user_id.as_ref().map(CallerId::as_str),
            "analysisType": record.analysis_kind.as_str(),
            "result": record.result_text,
            "createdAt": created_at,
            "modelId": record.model_identifier,
            "usage": record.usage,
        }));

        let mut item = Item::new(
            ItemKey::new(
                format!("{ANALYSIS_PARTITION_PREFIX}{}", record.analysis_id),
                METADATA_SORT_KEY,
            ),
            attributes,
        )
        .with_gsi2(ItemKey::new(
            format!("{DOCUMENT_PARTITION_PREFIX}{}", record.document_id.as_str()),
            created_at.clone(),
        ));
        if let Some(user) = &record.user_id {
            item = item.with_gsi1(ItemKey::new(user.as_str(), created_at));
        }

        self.store.put_item(&item).await?;
        Ok(record)
    }

    /// Turns of one conversation, oldest first.
    #[instrument(skip(self), fields(conversation_id = %conversation_id))]
    pub async fn conversation_turns(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<ConversationTurn>, MetadataStoreError> {
        self.store
            .query_partition(&conversation_partition(conversation_id))
            .await?
            .iter()
            .map(turn_from_item)
            .collect()
    }
}

fn attributes(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn turn_item(turn: &ConversationTurn) -> Item {
    let timestamp = format_timestamp(turn.timestamp);

    let attributes = attributes(json!({
        "id": turn.message_id.to_string(),
        "conversationId": turn.conversation_id.as_str(),
        "userId": turn.user_id.as_ref().map(CallerId::as_str),
        "message": turn.content,
        "role": turn.role.as_str(),
        "timestamp": timestamp,
        "ttl": turn.expires_at().timestamp(),
    }));

    let mut item = Item::new(
        ItemKey::new(
            conversation_partition(&turn.conversation_id),
            format!("{MESSAGE_SORT_PREFIX}{timestamp}#{}", turn.message_id),
        ),
        attributes,
    )
    .with_expiry(turn.expires_at());
    if let Some(user) = &turn.user_id {
        item = item.with_gsi1(ItemKey::new(user.as_str(), timestamp));
    }
    item
}

fn turn_from_item(item: &Item) -> Result<ConversationTurn, MetadataStoreError> {
    let malformed = |field: &str| {
        MetadataStoreError::MalformedItem(format!(
            "conversation turn {}/{} has no valid '{field}'",
            item.key.partition, item.key.sort
        ))
    };

    let message_id = item
        .str_attr("id")
        .and_then(|id| Uuid::parse_str(id).ok())
        .map(MessageId::from_uuid)
        .ok_or_else(|| malformed("id"))?;
    let conversation_id = item
        .str_attr("conversationId")
        .map(ConversationId::new)
        .ok_or_else(|| malformed("conversationId"))?;
    let role = item
        .str_attr("role")
        .and_then(|r| r.parse::<MessageRole>().ok())
        .ok_or_else(|| malformed("role"))?;
    let content = item
        .str_attr("message")
        .ok_or_else(|| malformed("message"))?
        .to_string();
    let timestamp = item
        .str_attr("timestamp")
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| malformed("timestamp"))?;

    Ok(ConversationTurn {
        message_id,
        conversation_id,
        user_id: item.str_attr("userId").map(CallerId::new),
        role,
        content,
        timestamp,
    })
}
