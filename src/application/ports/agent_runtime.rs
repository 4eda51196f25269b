use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{RetrievalFilter, RetrievedPassage};

use super::InferenceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInvocation {
    pub agent_id: String,
    pub agent_alias_id: String,
    pub session_id: String,
    pub input_text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub completion: String,
    #[serde(default)]
    pub citations: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    pub knowledge_base_id: String,
    pub query: String,
    pub filters: Vec<RetrievalFilter>,
    pub max_results: usize,
}

/// Agent-orchestration collaborator. Also hosts knowledge-base retrieval.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn invoke_agent(&self, request: &AgentInvocation) -> Result<AgentReply, InferenceError>;

    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<RetrievedPassage>, InferenceError>;
}
