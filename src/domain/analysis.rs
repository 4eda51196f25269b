use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::{CallerId, DocumentId, TokenUsage};

/// The analyses a caller may request. Every kind has a prompt template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    #[default]
    Summary,
    Entities,
    Sentiment,
    Custom,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Summary,
        AnalysisKind::Entities,
        AnalysisKind::Sentiment,
        AnalysisKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Summary => "summary",
            AnalysisKind::Entities => "entities",
            AnalysisKind::Sentiment => "sentiment",
            AnalysisKind::Custom => "custom",
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Invalid analysis kind: {}", s))
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller options of an analysis request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default, rename = "analysisType")]
    pub analysis_type: Option<String>,
    #[serde(default, rename = "customPrompt")]
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalysisId(Uuid);

impl AnalysisId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Outcome of one successful analysis. Written once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub analysis_id: AnalysisId,
    pub document_id: DocumentId,
    pub user_id: Option<CallerId>,
    pub analysis_kind: AnalysisKind,
    pub result_text: String,
    pub created_at: DateTime<Utc>,
    pub model_identifier: String,
    pub usage: TokenUsage,
}
