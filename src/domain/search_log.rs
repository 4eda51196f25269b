use std::fmt;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::CallerId;

pub const SEARCH_LOG_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchId(Uuid);

impl SearchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SearchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchLogEntry {
    pub search_id: SearchId,
    pub user_id: Option<CallerId>,
    pub query: String,
    pub result_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl SearchLogEntry {
    pub fn new(user_id: Option<CallerId>, query: String, result_count: usize) -> Self {
        Self {
            search_id: SearchId::new(),
            user_id,
            query,
            result_count,
            timestamp: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.timestamp + Duration::days(SEARCH_LOG_TTL_DAYS)
    }
}
