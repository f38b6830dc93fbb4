//! Debate configuration (layered: explicit setters > env > defaults).

use crate::error::{Result, RostraError};

/// Default OpenAI-compatible endpoint (DashScope compatible mode).
const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
const DEFAULT_MODEL: &str = "qwen-turbo";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_WINDOW_SIZE: usize = 6;
const DEFAULT_MAX_ROUNDS: u32 = 3;
const DEFAULT_STATS_PATH: &str = "data/statistics.csv";

/// What to do when a generator or tool call fails mid-turn.
///
/// `Degrade` reproduces the original orchestration behavior: the failure is
/// rendered as text inside the turn's message and the debate continues.
/// `Propagate` surfaces the error from the scheduler step instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Degrade,
    Propagate,
}

/// Configuration for a debate run.
#[derive(Debug, Clone)]
pub struct DebateConfig {
    /// Model identifier sent to the chat-completions endpoint.
    pub model: String,
    /// Base URL of the OpenAI-compatible service.
    pub base_url: String,
    /// API key for the text-generation service.
    pub api_key: Option<String>,
    /// Sampling temperature (0 = deterministic-leaning).
    pub temperature: f64,
    /// How many recent global messages each prompt includes.
    pub window_size: usize,
    /// Full pro/con cycles before the moderator closes the debate.
    pub max_rounds: u32,
    /// SerpAPI key for the optional web-search tool.
    pub serp_api_key: Option<String>,
    /// Path to the local teaching-statistics CSV.
    pub stats_path: String,
    /// Failure rendering policy for generator/tool errors.
    pub failure_policy: FailurePolicy,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            window_size: DEFAULT_WINDOW_SIZE,
            max_rounds: DEFAULT_MAX_ROUNDS,
            serp_api_key: None,
            stats_path: DEFAULT_STATS_PATH.to_string(),
            failure_policy: FailurePolicy::Degrade,
        }
    }
}

impl DebateConfig {
    /// Load from environment variables (`.env` honored if present).
    ///
    /// Recognized variables: `ROSTRA_MODEL`, `ROSTRA_BASE_URL`,
    /// `ROSTRA_API_KEY` (falling back to `OPENAI_API_KEY`),
    /// `ROSTRA_TEMPERATURE`, `ROSTRA_WINDOW_SIZE`, `ROSTRA_MAX_ROUNDS`,
    /// `ROSTRA_STATS_PATH`, `ROSTRA_FAILURE_POLICY` (`degrade`/`propagate`),
    /// and `SERP_API_KEY` for the web-search tool.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        if let Ok(model) = std::env::var("ROSTRA_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("ROSTRA_BASE_URL") {
            config.base_url = url;
        }
        config.api_key = std::env::var("ROSTRA_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok();
        config.serp_api_key = std::env::var("SERP_API_KEY").ok();

        if let Ok(raw) = std::env::var("ROSTRA_TEMPERATURE") {
            config.temperature = raw.parse().map_err(|_| {
                RostraError::Configuration(format!("invalid ROSTRA_TEMPERATURE: {raw}"))
            })?;
        }
        if let Ok(raw) = std::env::var("ROSTRA_WINDOW_SIZE") {
            config.window_size = raw.parse().map_err(|_| {
                RostraError::Configuration(format!("invalid ROSTRA_WINDOW_SIZE: {raw}"))
            })?;
        }
        if let Ok(raw) = std::env::var("ROSTRA_MAX_ROUNDS") {
            config.max_rounds = raw.parse().map_err(|_| {
                RostraError::Configuration(format!("invalid ROSTRA_MAX_ROUNDS: {raw}"))
            })?;
        }
        if let Ok(path) = std::env::var("ROSTRA_STATS_PATH") {
            config.stats_path = path;
        }
        if let Ok(raw) = std::env::var("ROSTRA_FAILURE_POLICY") {
            config.failure_policy = match raw.to_ascii_lowercase().as_str() {
                "degrade" => FailurePolicy::Degrade,
                "propagate" => FailurePolicy::Propagate,
                other => {
                    return Err(RostraError::Configuration(format!(
                        "invalid ROSTRA_FAILURE_POLICY: {other} (expected degrade or propagate)"
                    )))
                }
            };
        }

        Ok(config)
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the service endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the recent-message window size.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Override the number of full pro/con cycles.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Override the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = DebateConfig::default();
        assert_eq!(config.window_size, 6);
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.failure_policy, FailurePolicy::Degrade);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn builder_overrides_take_precedence() {
        let config = DebateConfig::default()
            .with_model("test-model")
            .with_base_url("http://localhost:9999/v1")
            .with_api_key("sk-test")
            .with_temperature(0.2)
            .with_window_size(4)
            .with_max_rounds(2)
            .with_failure_policy(FailurePolicy::Propagate);
        assert_eq!(config.model, "test-model");
        assert_eq!(config.base_url, "http://localhost:9999/v1");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.window_size, 4);
        assert_eq!(config.max_rounds, 2);
        assert_eq!(config.failure_policy, FailurePolicy::Propagate);
    }
}
