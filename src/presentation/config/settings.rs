use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub inference: InferenceSettings,
    pub storage: StorageSettings,
    pub metadata: MetadataSettings,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.{environment}` (optional) under `APP_`-prefixed
    /// environment variables, e.g. `APP_INFERENCE__MODEL_ID`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub health_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            health_port: 8081,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Reject requests that carry no caller identity with 401.
    pub require_identity: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            require_identity: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    pub endpoint: String,
    /// Agent and knowledge-base endpoint; defaults to `endpoint`.
    pub agent_endpoint: Option<String>,
    pub api_key: String,
    pub model_id: String,
    pub anthropic_version: String,
    pub agent_id: Option<String>,
    pub agent_alias_id: String,
    pub knowledge_base_id: Option<String>,
    pub max_search_results: usize,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://bedrock-runtime.us-east-1.amazonaws.com".to_string(),
            agent_endpoint: None,
            api_key: String::new(),
            model_id: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            anthropic_version: "bedrock-2023-05-31".to_string(),
            agent_id: None,
            agent_alias_id: "TSTALIASID".to_string(),
            knowledge_base_id: None,
            max_search_results: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    S3,
    #[default]
    Local,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Custom S3-compatible endpoint (MinIO, LocalStack).
    pub endpoint: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            local_path: "./data/documents".to_string(),
            bucket: None,
            region: None,
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataProviderSetting {
    Postgres,
    #[default]
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    pub provider: MetadataProviderSetting,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            provider: MetadataProviderSetting::Memory,
            database_url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub max_requests: usize,
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 10,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
