use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ai_service::application::ports::{
    AgentInvocation, AgentRuntime, InferenceError, RetrievalRequest,
};
use ai_service::domain::RetrievalFilter;
use ai_service::infrastructure::llm::BedrockAgentClient;

#[tokio::test]
async fn given_agent_session_when_invoking_then_input_text_is_posted_to_session_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/agents/agent-1/agentAliases/TSTALIASID/sessions/conv-7/text"))
        .and(body_json(json!({ "inputText": "What changed?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "completion": "Pricing changed in Q3.",
            "citations": [{ "retrievedReferences": [] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BedrockAgentClient::new(server.uri(), "test-key".to_string());
    let request = AgentInvocation {
        agent_id: "agent-1".to_string(),
        agent_alias_id: "TSTALIASID".to_string(),
        session_id: "conv-7".to_string(),
        input_text: "What changed?".to_string(),
    };

    let reply = client.invoke_agent(&request).await.unwrap();

    assert_eq!(reply.completion, "Pricing changed in Q3.");
    assert_eq!(reply.citations.len(), 1);
}

#[tokio::test]
async fn given_path_like_session_id_when_invoking_then_request_stays_on_configured_agent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "completion": "ok",
            "citations": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BedrockAgentClient::new(server.uri(), "test-key".to_string());
    let request = AgentInvocation {
        agent_id: "agent-1".to_string(),
        agent_alias_id: "TSTALIASID".to_string(),
        session_id: "../../../../other-agent/agentAliases/A/sessions/s?x=".to_string(),
        input_text: "hi".to_string(),
    };

    client.invoke_agent(&request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let url = &received[0].url;
    assert!(
        url.path()
            .starts_with("/agents/agent-1/agentAliases/TSTALIASID/sessions/"),
        "path was {}",
        url.path()
    );
    assert!(url.path().ends_with("/text"));
    assert_eq!(url.path_segments().map(|s| s.count()), Some(7));
    assert_eq!(url.query(), None);
}

#[tokio::test]
async fn given_dot_segment_session_id_when_invoking_then_fails_without_calling_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = BedrockAgentClient::new(server.uri(), "test-key".to_string());
    let request = AgentInvocation {
        agent_id: "agent-1".to_string(),
        agent_alias_id: "TSTALIASID".to_string(),
        session_id: "..".to_string(),
        input_text: "hi".to_string(),
    };

    let result = client.invoke_agent(&request).await;

    assert!(matches!(result, Err(InferenceError::ApiRequestFailed(_))));
}

#[tokio::test]
async fn given_retrieval_results_when_retrieving_then_passages_are_flattened() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/knowledgebases/kb-1/retrieve"))
        .and(body_partial_json(json!({
            "retrievalQuery": { "text": "refunds" },
            "retrievalConfiguration": {
                "vectorSearchConfiguration": {
                    "numberOfResults": 10,
                    "filter": { "equals": { "key": "department", "value": "finance" } }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "retrievalResults": [
                {
                    "content": { "text": "Refunds take 14 days." },
                    "metadata": { "department": "finance", "page": 2 },
                    "score": 0.91
                },
                { "content": { "text": "Second passage" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BedrockAgentClient::new(server.uri(), "test-key".to_string());
    let request = RetrievalRequest {
        knowledge_base_id: "kb-1".to_string(),
        query: "refunds".to_string(),
        filters: vec![RetrievalFilter::Equals {
            key: "department".to_string(),
            value: "finance".to_string(),
        }],
        max_results: 10,
    };

    let passages = client.retrieve(&request).await.unwrap();

    assert_eq!(passages.len(), 2);
    assert_eq!(passages[0].content, "Refunds take 14 days.");
    assert_eq!(passages[0].metadata["page"], "2");
    assert_eq!(passages[0].score, 0.91);
    assert!(passages[1].metadata.is_empty());
    assert_eq!(passages[1].score, 0.0);
}

#[tokio::test]
async fn given_upstream_failure_when_retrieving_then_request_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = BedrockAgentClient::new(server.uri(), "test-key".to_string());
    let request = RetrievalRequest {
        knowledge_base_id: "kb-1".to_string(),
        query: "refunds".to_string(),
        filters: vec![],
        max_results: 5,
    };

    let err = client.retrieve(&request).await.unwrap_err();

    assert!(matches!(err, InferenceError::ApiRequestFailed(_)));
}
