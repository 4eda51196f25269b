/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_level: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: "local".to_string(),
            json_format: false,
            default_level: "info".to_string(),
        }
    }
}

impl TracingConfig {
    pub fn filter_directive(&self) -> String {
        format!(
            "{level},ai_service={level},tower_http=debug",
            level = self.default_level
        )
    }
}
