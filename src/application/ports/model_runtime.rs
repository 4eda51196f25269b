use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, TokenUsage};

use super::InferenceError;

/// Request body of a direct model invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInvocation {
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub top_p: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelReply {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: TokenUsage,
}

#[async_trait]
pub trait ModelRuntime: Send + Sync {
    async fn invoke_model(
        &self,
        model_id: &str,
        request: &ModelInvocation,
    ) -> Result<ModelReply, InferenceError>;
}
