//! Text-generation provider trait and implementations.

pub mod http;
pub mod openai;

use async_trait::async_trait;

use crate::config::DebateConfig;
use crate::error::Result;

/// A text-generation service: prompt string in, completion out.
///
/// The debate core treats this as a black box; scheduler and persona code are
/// written against the trait so tests can script completions without a server.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate one completion for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Create the default provider for the given config.
pub fn create_generator(config: &DebateConfig) -> Result<Box<dyn TextGenerator>> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        crate::error::RostraError::Authentication("Missing ROSTRA_API_KEY".into())
    })?;
    Ok(Box::new(openai::OpenAiChatProvider::new(
        config.model.clone(),
        api_key,
        config.base_url.clone(),
        config.temperature,
    )))
}
