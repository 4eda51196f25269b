use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::instrument;

use crate::application::ports::{InferenceError, ModelInvocation, ModelReply, ModelRuntime};

/// Model runtime over the managed inference REST API (`/model/{id}/invoke`).
pub struct BedrockRuntimeClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl BedrockRuntimeClient {
    pub fn new(endpoint: impl Into<String>, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl ModelRuntime for BedrockRuntimeClient {
    #[instrument(skip(self, request), fields(max_tokens = request.max_tokens))]
    async fn invoke_model(
        &self,
        model_id: &str,
        request: &ModelInvocation,
    ) -> Result<ModelReply, InferenceError> {
        let response = self
            .client
            .post(format!("{}/model/{}/invoke", self.endpoint, model_id))
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(request)
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
            .json::<ModelReply>()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))
    }
}
