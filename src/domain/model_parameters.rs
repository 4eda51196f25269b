use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TOP_P: f64 = 0.9;

pub const MIN_MAX_TOKENS: i64 = 1;
pub const MAX_MAX_TOKENS: i64 = 4000;

/// Caller-supplied sampling parameters. Every field is optional.
///
/// `max_tokens` is kept signed so that negative input reaches range
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ModelParameterOverrides {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default, rename = "maxTokens", alias = "max_tokens")]
    pub max_tokens: Option<i64>,
    #[serde(default, rename = "topP", alias = "top_p")]
    pub top_p: Option<f64>,
}

/// Fully resolved sampling parameters sent to the model runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelParameters {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
        }
    }
}

impl ModelParameters {
    /// Field-by-field merge; caller values win. Range checks happen before this.
    pub fn merged(overrides: &ModelParameterOverrides) -> Self {
        let defaults = Self::default();
        Self {
            temperature: overrides.temperature.unwrap_or(defaults.temperature),
            max_tokens: overrides
                .max_tokens
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults.max_tokens),
            top_p: overrides.top_p.unwrap_or(defaults.top_p),
        }
    }

    pub fn for_analysis() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 4000,
            ..Self::default()
        }
    }
}
