use std::collections::BTreeMap;

use serde::Serialize;

/// Metadata condition applied to a knowledge-base retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalFilter {
    Equals { key: String, value: String },
    AnyOf { key: String, values: Vec<String> },
}

/// One passage returned by the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedPassage {
    pub content: String,
    pub metadata: BTreeMap<String, String>,
    pub score: f64,
}
