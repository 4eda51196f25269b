use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use ai_service::application::ports::{AgentRuntime, MetadataStore, RateLimiter};
use ai_service::application::services::{
    AgentTarget, AuditLogger, DocumentAccessor, InferenceConfig, InferenceService,
};
use ai_service::infrastructure::llm::{BedrockAgentClient, BedrockRuntimeClient};
use ai_service::infrastructure::observability::{TracingConfig, init_tracing};
use ai_service::infrastructure::persistence::{
    InMemoryMetadataStore, PgMetadataStore, create_pool, run_migrations,
};
use ai_service::infrastructure::rate_limit::{SlidingWindowRateLimiter, UnlimitedRateLimiter};
use ai_service::infrastructure::storage::ContentStoreFactory;
use ai_service::presentation::config::{MetadataProviderSetting, MetadataSettings};
use ai_service::presentation::{
    AppState, Environment, Settings, create_health_router, create_router,
};

const PURGE_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.enable_json,
        default_level: settings.logging.level.clone(),
    });

    let metadata_store = build_metadata_store(&settings.metadata).await?;
    let content_store = ContentStoreFactory::create(&settings.storage)?;

    let inference = &settings.inference;
    let model_runtime = Arc::new(BedrockRuntimeClient::new(
        inference.endpoint.clone(),
        inference.api_key.clone(),
    ));
    let agent_runtime: Option<Arc<dyn AgentRuntime>> =
        (inference.agent_id.is_some() || inference.knowledge_base_id.is_some()).then(|| {
            Arc::new(BedrockAgentClient::new(
                inference
                    .agent_endpoint
                    .clone()
                    .unwrap_or_else(|| inference.endpoint.clone()),
                inference.api_key.clone(),
            )) as Arc<dyn AgentRuntime>
        });

    let inference_service = Arc::new(InferenceService::new(
        model_runtime,
        agent_runtime,
        InferenceConfig {
            model_id: inference.model_id.clone(),
            anthropic_version: inference.anthropic_version.clone(),
            agent: inference.agent_id.clone().map(|agent_id| AgentTarget {
                agent_id,
                agent_alias_id: inference.agent_alias_id.clone(),
            }),
            knowledge_base_id: inference.knowledge_base_id.clone(),
            max_search_results: inference.max_search_results,
        },
    ));

    let rate_limiter: Arc<dyn RateLimiter> = if settings.rate_limit.enabled {
        Arc::new(SlidingWindowRateLimiter::new(
            settings.rate_limit.max_requests,
            Duration::from_secs(settings.rate_limit.window_secs),
        ))
    } else {
        Arc::new(UnlimitedRateLimiter)
    };

    let state = AppState {
        inference_service,
        document_accessor: Arc::new(DocumentAccessor::new(
            Arc::clone(&metadata_store),
            content_store,
        )),
        audit_logger: Arc::new(AuditLogger::new(metadata_store)),
        rate_limiter,
        require_identity: settings.auth.require_identity,
    };

    let host: std::net::IpAddr = settings
        .server
        .host
        .parse()
        .context("server.host must be an IP address")?;
    let api_addr = SocketAddr::new(host, settings.server.port);
    let health_addr = SocketAddr::new(host, settings.server.health_port);

    let api_listener = TcpListener::bind(api_addr).await?;
    let health_listener = TcpListener::bind(health_addr).await?;
    tracing::info!(%api_addr, %health_addr, environment = %environment, "Listening");

    tokio::try_join!(
        axum::serve(api_listener, create_router(state))
            .with_graceful_shutdown(shutdown_signal())
            .into_future(),
        axum::serve(health_listener, create_health_router())
            .with_graceful_shutdown(shutdown_signal())
            .into_future(),
    )?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn build_metadata_store(
    settings: &MetadataSettings,
) -> anyhow::Result<Arc<dyn MetadataStore>> {
    match settings.provider {
        MetadataProviderSetting::Memory => {
            tracing::warn!("Using in-memory metadata store; records are lost on restart");
            Ok(Arc::new(InMemoryMetadataStore::new()))
        }
        MetadataProviderSetting::Postgres => {
            let url = settings
                .database_url
                .as_deref()
                .context("metadata.database_url is required for the postgres provider")?;
            let pool = create_pool(url, settings.max_connections).await?;
            run_migrations(&pool).await?;

            let store = Arc::new(PgMetadataStore::new(pool));
            let purger = Arc::clone(&store);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(PURGE_INTERVAL);
                loop {
                    interval.tick().await;
                    match purger.purge_expired().await {
                        Ok(removed) => tracing::debug!(removed, "Expired records purged"),
                        Err(e) => tracing::warn!(error = %e, "Expired record purge failed"),
                    }
                }
            });

            Ok(store as Arc<dyn MetadataStore>)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
