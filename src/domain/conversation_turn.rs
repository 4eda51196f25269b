use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CallerId, MessageRole};

pub const CONVERSATION_TURN_TTL_DAYS: i64 = 90;

/// Caller-chosen or generated conversation handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One appended conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub user_id: Option<CallerId>,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        conversation_id: ConversationId,
        user_id: Option<CallerId>,
        role: MessageRole,
        content: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            message_id: MessageId::new(),
            conversation_id,
            user_id,
            role,
            content,
            timestamp,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.timestamp + Duration::days(CONVERSATION_TURN_TTL_DAYS)
    }
}
