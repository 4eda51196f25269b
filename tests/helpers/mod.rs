#![allow(dead_code)]

mod test_postgres;

pub use test_postgres::TestPostgres;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use serde_json::{Map, Value, json};

use ai_service::application::ports::{
    AgentInvocation, AgentReply, AgentRuntime, ContentBlock, InferenceError, Item, ItemKey,
    MetadataStore, MetadataStoreError, ModelInvocation, ModelReply, ModelRuntime, RateLimiter,
    RetrievalRequest,
};
use ai_service::application::services::{
    AgentTarget, AuditLogger, DocumentAccessor, InferenceConfig, InferenceService, document_key,
};
use ai_service::domain::{CallerId, RetrievedPassage, TokenUsage};
use ai_service::infrastructure::persistence::InMemoryMetadataStore;
use ai_service::infrastructure::rate_limit::UnlimitedRateLimiter;
use ai_service::infrastructure::storage::ObjectContentStore;
use ai_service::presentation::AppState;

pub const TEST_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const TEST_AGENT_ID: &str = "agent-1";

/// Model runtime that records every request and answers with fixed text.
pub struct RecordingModelRuntime {
    pub requests: Mutex<Vec<(String, ModelInvocation)>>,
    reply_text: String,
    fail: bool,
}

impl RecordingModelRuntime {
    pub fn replying(text: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply_text: text.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply_text: String::new(),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ModelInvocation> {
        self.requests.lock().unwrap().last().map(|(_, r)| r.clone())
    }
}

#[async_trait]
impl ModelRuntime for RecordingModelRuntime {
    async fn invoke_model(
        &self,
        model_id: &str,
        request: &ModelInvocation,
    ) -> Result<ModelReply, InferenceError> {
        self.requests
            .lock()
            .unwrap()
            .push((model_id.to_string(), request.clone()));

        if self.fail {
            return Err(InferenceError::ApiRequestFailed("HTTP 500: boom".into()));
        }

        Ok(ModelReply {
            content: vec![ContentBlock {
                kind: "text".to_string(),
                text: Some(self.reply_text.clone()),
            }],
            usage: TokenUsage {
                input_tokens: 12,
                output_tokens: 7,
            },
        })
    }
}

/// Agent runtime with canned completion and retrieval results.
#[derive(Default)]
pub struct StubAgentRuntime {
    pub invocations: Mutex<Vec<AgentInvocation>>,
    pub retrievals: Mutex<Vec<RetrievalRequest>>,
    pub passages: Vec<RetrievedPassage>,
}

#[async_trait]
impl AgentRuntime for StubAgentRuntime {
    async fn invoke_agent(&self, request: &AgentInvocation) -> Result<AgentReply, InferenceError> {
        self.invocations.lock().unwrap().push(request.clone());
        Ok(AgentReply {
            completion: format!("agent says: {}", request.input_text),
            citations: vec![json!({ "source": "kb://doc-1" })],
        })
    }

    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<RetrievedPassage>, InferenceError> {
        self.retrievals.lock().unwrap().push(request.clone());
        Ok(self.passages.clone())
    }
}

/// Metadata store whose writes always fail; reads delegate to an inner store.
pub struct FailingWriteStore {
    pub inner: InMemoryMetadataStore,
}

#[async_trait]
impl MetadataStore for FailingWriteStore {
    async fn get_item(&self, key: &ItemKey) -> Result<Option<Item>, MetadataStoreError> {
        self.inner.get_item(key).await
    }

    async fn put_item(&self, _item: &Item) -> Result<(), MetadataStoreError> {
        Err(MetadataStoreError::QueryFailed("write rejected".into()))
    }

    async fn query_partition(&self, partition: &str) -> Result<Vec<Item>, MetadataStoreError> {
        self.inner.query_partition(partition).await
    }
}

pub struct DenyAllRateLimiter;

#[async_trait]
impl RateLimiter for DenyAllRateLimiter {
    async fn allow(&self, _caller: &CallerId) -> bool {
        false
    }
}

/// Everything a router test needs to inspect after a request.
pub struct TestContext {
    pub state: AppState,
    pub model: Arc<RecordingModelRuntime>,
    pub agent: Arc<StubAgentRuntime>,
    pub metadata: Arc<InMemoryMetadataStore>,
    pub objects: Arc<InMemory>,
}

pub struct TestContextBuilder {
    model: Arc<RecordingModelRuntime>,
    agent: Arc<StubAgentRuntime>,
    agent_configured: bool,
    knowledge_base_id: Option<String>,
    require_identity: bool,
    rate_limiter: Arc<dyn RateLimiter>,
    metadata_override: Option<Arc<dyn MetadataStore>>,
}

impl Default for TestContextBuilder {
    fn default() -> Self {
        Self {
            model: Arc::new(RecordingModelRuntime::replying("Hello! How can I help?")),
            agent: Arc::new(StubAgentRuntime::default()),
            agent_configured: false,
            knowledge_base_id: None,
            require_identity: true,
            rate_limiter: Arc::new(UnlimitedRateLimiter),
            metadata_override: None,
        }
    }
}

impl TestContextBuilder {
    pub fn model(mut self, model: RecordingModelRuntime) -> Self {
        self.model = Arc::new(model);
        self
    }

    pub fn agent(mut self, agent: StubAgentRuntime) -> Self {
        self.agent = Arc::new(agent);
        self.agent_configured = true;
        self
    }

    pub fn knowledge_base(mut self, id: &str) -> Self {
        self.knowledge_base_id = Some(id.to_string());
        self
    }

    pub fn require_identity(mut self, required: bool) -> Self {
        self.require_identity = required;
        self
    }

    pub fn rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    pub fn metadata_store(mut self, store: Arc<dyn MetadataStore>) -> Self {
        self.metadata_override = Some(store);
        self
    }

    pub fn build(self) -> TestContext {
        let metadata = Arc::new(InMemoryMetadataStore::new());
        let objects = Arc::new(InMemory::new());
        let store: Arc<dyn MetadataStore> = self
            .metadata_override
            .unwrap_or_else(|| Arc::clone(&metadata) as Arc<dyn MetadataStore>);

        let agent_runtime = Arc::clone(&self.agent) as Arc<dyn AgentRuntime>;
        let inference_service = InferenceService::new(
            Arc::clone(&self.model) as Arc<dyn ModelRuntime>,
            Some(agent_runtime),
            InferenceConfig {
                model_id: TEST_MODEL_ID.to_string(),
                anthropic_version: "bedrock-2023-05-31".to_string(),
                agent: self.agent_configured.then(|| AgentTarget {
                    agent_id: TEST_AGENT_ID.to_string(),
                    agent_alias_id: "TSTALIASID".to_string(),
                }),
                knowledge_base_id: self.knowledge_base_id,
                max_search_results: 10,
            },
        );

        let content_store = Arc::new(ObjectContentStore::new(
            Arc::clone(&objects) as Arc<dyn ObjectStore>
        ));

        let state = AppState {
            inference_service: Arc::new(inference_service),
            document_accessor: Arc::new(DocumentAccessor::new(Arc::clone(&store), content_store)),
            audit_logger: Arc::new(AuditLogger::new(store)),
            rate_limiter: self.rate_limiter,
            require_identity: self.require_identity,
        };

        TestContext {
            state,
            model: self.model,
            agent: self.agent,
            metadata,
            objects,
        }
    }
}

impl TestContext {
    pub fn builder() -> TestContextBuilder {
        TestContextBuilder::default()
    }

    /// Stores document metadata the way the ingestion path writes it.
    pub async fn seed_document(&self, id: &str, owner: &str, access: &str, key: &str) {
        let mut attributes = Map::new();
        attributes.insert("id".into(), json!(id));
        attributes.insert("userId".into(), json!(owner));
        attributes.insert("access".into(), json!(access));
        attributes.insert("title".into(), json!("Quarterly Report"));
        attributes.insert("docType".into(), json!("report"));
        attributes.insert("s3Key".into(), json!(key));

        let item = Item::new(
            document_key(&ai_service::domain::DocumentId::new(id)),
            attributes,
        );
        self.metadata.put_item(&item).await.unwrap();
    }

    pub async fn seed_object(&self, key: &str, content_type: &'static str, body: &'static [u8]) {
        put_object(&self.objects, key, content_type, body).await;
    }

    pub async fn partition(&self, partition: &str) -> Vec<Item> {
        self.metadata.query_partition(partition).await.unwrap()
    }
}

pub async fn put_object(store: &InMemory, key: &str, content_type: &'static str, body: &'static [u8]) {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.into());
    store
        .put_opts(
            &StorePath::from(key),
            PutPayload::from_static(body),
            PutOptions {
                attributes,
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

pub fn attr<'a>(item: &'a Item, name: &str) -> &'a Value {
    item.attributes.get(name).unwrap_or(&Value::Null)
}
