mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VARIABLE, Environment};
pub use settings::{
    AuthSettings, InferenceSettings, LoggingSettings, MetadataProviderSetting, MetadataSettings,
    RateLimitSettings, ServerSettings, Settings, StorageProviderSetting, StorageSettings,
};
