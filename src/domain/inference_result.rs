use serde::{Deserialize, Serialize};

/// Token accounting as reported by the model runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Normalized reply of either a direct model invocation or an agent session.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    pub text: String,
    pub usage: TokenUsage,
    pub model_identifier: String,
    pub session_id: Option<String>,
    pub citations: Vec<serde_json::Value>,
}

impl InferenceResult {
    pub fn from_model(text: String, usage: TokenUsage, model_identifier: String) -> Self {
        Self {
            text,
            usage,
            model_identifier,
            session_id: None,
            citations: Vec::new(),
        }
    }
}
