use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{
    AgentInvocation, AgentRuntime, InferenceError, ModelInvocation, ModelReply, ModelRuntime,
    RetrievalRequest,
};
use crate::domain::{
    ChatMessage, InferenceResult, ModelParameters, RetrievalFilter, RetrievedPassage, TokenUsage,
};

pub const DEFAULT_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTarget {
    pub agent_id: String,
    pub agent_alias_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    pub model_id: String,
    pub anthropic_version: String,
    pub agent: Option<AgentTarget>,
    pub knowledge_base_id: Option<String>,
    pub max_search_results: usize,
}

/// Front for the model runtime and the agent runtime. Both reply shapes are
/// normalized into `InferenceResult`.
pub struct InferenceService {
    model_runtime: Arc<dyn ModelRuntime>,
    agent_runtime: Option<Arc<dyn AgentRuntime>>,
    config: InferenceConfig,
}

impl InferenceService {
    pub fn new(
        model_runtime: Arc<dyn ModelRuntime>,
        agent_runtime: Option<Arc<dyn AgentRuntime>>,
        config: InferenceConfig,
    ) -> Self {
        Self {
            model_runtime,
            agent_runtime,
            config,
        }
    }

    pub fn agent_available(&self) -> bool {
        self.agent_runtime.is_some() && self.config.agent.is_some()
    }

    pub fn knowledge_base_configured(&self) -> bool {
        self.agent_runtime.is_some() && self.config.knowledge_base_id.is_some()
    }

    pub fn model_id(&self) -> &str {
        &self.config.model_id
    }

    #[instrument(skip(self, messages), fields(model_id = %self.config.model_id, message_count = messages.len()))]
    pub async fn invoke_model(
        &self,
        messages: &[ChatMessage],
        parameters: &ModelParameters,
    ) -> Result<InferenceResult, InferenceError> {
        let request = ModelInvocation {
            anthropic_version: self.config.anthropic_version.clone(),
            max_tokens: parameters.max_tokens,
            messages: messages.to_vec(),
            temperature: parameters.temperature,
            top_p: parameters.top_p,
        };

        let reply = self
            .model_runtime
            .invoke_model(&self.config.model_id, &request)
            .await?;

        let usage = reply.usage;
        let text = concatenate_text(reply);
        tracing::debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Model invocation completed"
        );

        Ok(InferenceResult::from_model(
            text,
            usage,
            self.config.model_id.clone(),
        ))
    }

    /// Only the newest message is sent; earlier turns live in the agent session.
    #[instrument(skip(self, messages))]
    pub async fn invoke_agent(
        &self,
        messages: &[ChatMessage],
        session_id: Option<&str>,
    ) -> Result<InferenceResult, InferenceError> {
        let (Some(runtime), Some(target)) = (&self.agent_runtime, &self.config.agent) else {
            return Err(InferenceError::AgentNotConfigured);
        };

        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let request = AgentInvocation {
            agent_id: target.agent_id.clone(),
            agent_alias_id: target.agent_alias_id.clone(),
            session_id: session_id.clone(),
            input_text: messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default(),
        };

        let reply = runtime.invoke_agent(&request).await?;

        Ok(InferenceResult {
            text: reply.completion,
            usage: TokenUsage::default(),
            model_identifier: target.agent_id.clone(),
            session_id: Some(session_id),
            citations: reply.citations,
        })
    }

    #[instrument(skip(self, query, filters), fields(filter_count = filters.len()))]
    pub async fn search_knowledge_base(
        &self,
        query: &str,
        filters: Vec<RetrievalFilter>,
    ) -> Result<Vec<RetrievedPassage>, InferenceError> {
        let (Some(runtime), Some(knowledge_base_id)) =
            (&self.agent_runtime, &self.config.knowledge_base_id)
        else {
            return Err(InferenceError::KnowledgeBaseNotConfigured);
        };

        let request = RetrievalRequest {
            knowledge_base_id: knowledge_base_id.clone(),
            query: query.to_string(),
            filters,
            max_results: self.config.max_search_results,
        };

        runtime.retrieve(&request).await
    }
}

fn concatenate_text(reply: ModelReply) -> String {
    reply
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect()
}
