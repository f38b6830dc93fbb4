//! Debate personas and the default turn generator.

use strum::Display;

use crate::config::FailurePolicy;
use crate::error::Result;
use crate::memory::{MemoryStore, DEFAULT_SUMMARY_BUDGET};
use crate::provider::TextGenerator;
use crate::types::TurnMessage;

/// A persona's role in the debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Moderator,
    Supporter,
    Opponent,
}

/// A named debate participant with fixed instructions and private memory.
///
/// Created once at startup and alive for the whole debate. Each persona
/// exclusively owns its memory store; no persona reads another's.
pub struct Persona {
    pub name: String,
    pub role: Role,
    system_prompt: String,
    capabilities: Vec<String>,
    strategy: String,
    memory: MemoryStore,
}

impl Persona {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        system_prompt: impl Into<String>,
        capabilities: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            role,
            system_prompt: system_prompt.into(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            strategy: "balanced".to_string(),
            memory: MemoryStore::new(),
        }
    }

    /// Assemble the turn prompt: identity, capabilities, strategy, memory
    /// summary, and the last `window` global messages.
    pub fn build_prompt(&self, history: &[TurnMessage], window: usize) -> String {
        let start = history.len().saturating_sub(window);
        let recent = history[start..]
            .iter()
            .map(|m| m.as_line())
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{}\n\nCapabilities: {}\nStrategy: {}\n\n[Memory summary]\n{}\n\n\
             [Recent conversation]\n{}\n\nSpeak based on the information above.",
            self.system_prompt,
            self.capabilities.join(", "),
            self.strategy,
            self.memory.summarize(DEFAULT_SUMMARY_BUDGET),
            if recent.is_empty() { "(none)" } else { &recent },
        )
    }

    /// Default turn path: one generation call over the assembled prompt.
    ///
    /// The reply is recorded into this persona's own memory before returning.
    pub async fn reply(
        &mut self,
        history: &[TurnMessage],
        window: usize,
        generator: &dyn TextGenerator,
        policy: FailurePolicy,
    ) -> Result<TurnMessage> {
        let prompt = self.build_prompt(history, window);
        let content = match generator.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => match policy {
                FailurePolicy::Degrade => format!("[generation error] {e}"),
                FailurePolicy::Propagate => return Err(e),
            },
        };
        Ok(self.record(content))
    }

    /// Wrap content as this persona's message and remember it.
    pub fn record(&mut self, content: impl Into<String>) -> TurnMessage {
        let msg = TurnMessage::new(self.name.clone(), content);
        self.memory.add(&msg);
        msg
    }

    /// Read access to the persona's memory (tests, diagnostics).
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(crate::error::RostraError::Generation("backend down".into()))
        }
    }

    fn persona() -> Persona {
        Persona::new(
            "Pro2",
            Role::Supporter,
            "Second pro speaker; analyze cost and feasibility.",
            &["data analysis", "rigorous reasoning"],
        )
    }

    #[test]
    fn prompt_includes_identity_memory_and_window() {
        let p = persona();
        let history = vec![
            TurnMessage::new("Moderator", "welcome"),
            TurnMessage::new("Pro1", "first point"),
        ];
        let prompt = p.build_prompt(&history, 6);
        assert!(prompt.contains("Second pro speaker"));
        assert!(prompt.contains("data analysis, rigorous reasoning"));
        assert!(prompt.contains("Strategy: balanced"));
        assert!(prompt.contains("(no notable memory)"));
        assert!(prompt.contains("Pro1: first point"));
    }

    #[test]
    fn prompt_window_limits_history() {
        let p = persona();
        let history: Vec<TurnMessage> = (0..10)
            .map(|i| TurnMessage::new("X", format!("msg {i}")))
            .collect();
        let prompt = p.build_prompt(&history, 3);
        assert!(!prompt.contains("msg 6"));
        assert!(prompt.contains("msg 7"));
        assert!(prompt.contains("msg 9"));
    }

    #[tokio::test]
    async fn reply_records_into_own_memory() {
        let mut p = persona();
        let msg = p
            .reply(&[], 6, &Canned("my argument"), FailurePolicy::Degrade)
            .await
            .unwrap();
        assert_eq!(msg.speaker, "Pro2");
        assert_eq!(msg.content, "my argument");
        assert_eq!(p.memory().short_term().len(), 1);
    }

    #[tokio::test]
    async fn reply_degrades_generation_failure_to_text() {
        let mut p = persona();
        let msg = p
            .reply(&[], 6, &Failing, FailurePolicy::Degrade)
            .await
            .unwrap();
        assert!(msg.content.contains("[generation error]"));
        assert!(msg.content.contains("backend down"));
    }

    #[tokio::test]
    async fn reply_propagates_when_configured() {
        let mut p = persona();
        let result = p.reply(&[], 6, &Failing, FailurePolicy::Propagate).await;
        assert!(result.is_err());
    }
}
