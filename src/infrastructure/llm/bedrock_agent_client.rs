use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::application::ports::{
    AgentInvocation, AgentReply, AgentRuntime, InferenceError, RetrievalRequest,
};
use crate::domain::{RetrievalFilter, RetrievedPassage};

/// Agent-orchestration and knowledge-base retrieval over the managed agent
/// runtime REST API.
pub struct BedrockAgentClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct InvokeAgentBody<'a> {
    #[serde(rename = "inputText")]
    input_text: &'a str,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    #[serde(default, rename = "retrievalResults")]
    retrieval_results: Vec<RetrievalResult>,
}

#[derive(Deserialize)]
struct RetrievalResult {
    #[serde(default)]
    content: RetrievalContent,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    score: f64,
}

#[derive(Default, Deserialize)]
struct RetrievalContent {
    #[serde(default)]
    text: String,
}

impl BedrockAgentClient {
    pub fn new(endpoint: impl Into<String>, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Appends each segment percent-encoded, so ids can never add path
    /// levels or a query string.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, InferenceError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || matches!(**s, "." | ".."))
        {
            return Err(InferenceError::ApiRequestFailed(format!(
                "invalid path segment: {bad:?}"
            )));
        }

        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            InferenceError::ApiRequestFailed(format!("invalid agent endpoint: {e}"))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                InferenceError::ApiRequestFailed(format!(
                    "agent endpoint cannot take a path: {}",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_json<B, R>(&self, url: Url, body: &B) -> Result<R, InferenceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| InferenceError::ApiRequestFailed(e.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(InferenceError::Throttled);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AgentRuntime for BedrockAgentClient {
    #[instrument(skip(self, request), fields(agent_id = %request.agent_id, session_id = %request.session_id))]
    async fn invoke_agent(&self, request: &AgentInvocation) -> Result<AgentReply, InferenceError> {
        let url = self.endpoint_url(&[
            "agents",
            request.agent_id.as_str(),
            "agentAliases",
            request.agent_alias_id.as_str(),
            "sessions",
            request.session_id.as_str(),
            "text",
        ])?;
        self.post_json(
            url,
            &InvokeAgentBody {
                input_text: &request.input_text,
            },
        )
        .await
    }

    #[instrument(skip(self, request), fields(knowledge_base_id = %request.knowledge_base_id))]
    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<RetrievedPassage>, InferenceError> {
        let url = self.endpoint_url(&[
            "knowledgebases",
            request.knowledge_base_id.as_str(),
            "retrieve",
        ])?;
        let response: RetrieveResponse = self.post_json(url, &retrieve_body(request)).await?;

        Ok(response
            .retrieval_results
            .into_iter()
            .map(|result| RetrievedPassage {
                content: result.content.text,
                metadata: flatten_metadata(result.metadata),
                score: result.score,
            })
            .collect())
    }
}

fn retrieve_body(request: &RetrievalRequest) -> Value {
    let mut vector_search = json!({ "numberOfResults": request.max_results });
    if let Some(filter) = filter_expression(&request.filters) {
        vector_search["filter"] = filter;
    }

    json!({
        "retrievalQuery": { "text": request.query },
        "retrievalConfiguration": { "vectorSearchConfiguration": vector_search },
    })
}

fn filter_expression(filters: &[RetrievalFilter]) -> Option<Value> {
    let mut conditions: Vec<Value> = filters
        .iter()
        .map(|filter| match filter {
            RetrievalFilter::Equals { key, value } => {
                json!({ "equals": { "key": key, "value": value } })
            }
            RetrievalFilter::AnyOf { key, values } => {
                json!({ "in": { "key": key, "value": values } })
            }
        })
        .collect();

    match conditions.len() {
        0 => None,
        1 => conditions.pop(),
        _ => Some(json!({ "andAll": conditions })),
    }
}

fn flatten_metadata(metadata: Map<String, Value>) -> BTreeMap<String, String> {
    metadata
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}
