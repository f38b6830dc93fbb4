//! Transcript message type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single message in the debate transcript.
///
/// Immutable once created; transcript ordering is append order. A speaker may
/// repeat, so no uniqueness is implied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnMessage {
    pub speaker: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TurnMessage {
    /// Create a message stamped with the current instant.
    pub fn new(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Render as a `speaker: content` line for prompt context.
    pub fn as_line(&self) -> String {
        format!("{}: {}", self.speaker, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_line_joins_speaker_and_content() {
        let msg = TurnMessage::new("Pro1", "opening statement");
        assert_eq!(msg.as_line(), "Pro1: opening statement");
    }

    #[test]
    fn serializes_round_trip() {
        let msg = TurnMessage::new("Moderator", "welcome");
        let json = serde_json::to_string(&msg).unwrap();
        let back: TurnMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
