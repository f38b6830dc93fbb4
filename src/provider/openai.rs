//! OpenAI-compatible Chat Completions provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, RostraError};

use super::http::{bearer_headers, shared_client, status_to_error};
use super::TextGenerator;

/// Provider for any OpenAI-compatible chat-completions API.
pub struct OpenAiChatProvider {
    model: String,
    api_key: String,
    base_url: String,
    temperature: f64,
}

impl OpenAiChatProvider {
    pub fn new(model: String, api_key: String, base_url: String, temperature: f64) -> Self {
        Self {
            model,
            api_key,
            base_url,
            temperature,
        }
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(prompt);

        debug!(model = %self.model, "chat completion request");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: ChatResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RostraError::api(200, "No choices in chat response"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_model_and_temperature() {
        let provider = OpenAiChatProvider::new(
            "qwen-turbo".into(),
            "sk-test".into(),
            "http://localhost/v1".into(),
            0.7,
        );
        let body = provider.build_request_body("hello");
        assert_eq!(body["model"], "qwen-turbo");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }
}
