use std::fmt;

use serde::{Deserialize, Serialize};

use super::CallerId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Private,
    Public,
}

/// Object-store key of a document's raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn extension(&self) -> Option<&str> {
        let file_name = self.0.rsplit('/').next()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then_some(ext)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document metadata written by the ingestion path. Read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub owner_user_id: String,
    pub access_level: AccessLevel,
    pub title: String,
    pub doc_type: String,
    pub storage_key: StorageKey,
}

impl DocumentRecord {
    pub fn is_accessible_by(&self, caller: Option<&CallerId>) -> bool {
        if self.access_level == AccessLevel::Public {
            return true;
        }
        caller.is_some_and(|c| c.as_str() == self.owner_user_id)
    }
}

/// How document bytes are turned into prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Text,
    Pdf,
    Binary,
}

impl MediaKind {
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.to_ascii_lowercase();
        if media_type.contains("text") || media_type.contains("json") {
            Self::Text
        } else if media_type.contains("pdf") {
            Self::Pdf
        } else {
            Self::Binary
        }
    }

    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "txt" | "md" | "csv" | "json" | "html" | "htm" | "xml" => Self::Text,
            "pdf" => Self::Pdf,
            _ => Self::Binary,
        }
    }
}
