//! Error types for Rostra.

use thiserror::Error;

/// Primary error type for all Rostra operations.
#[derive(Error, Debug)]
pub enum RostraError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Tool execution error: {tool_name} — {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl RostraError {
    /// Create an API error for a given status code.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a tool execution error.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RostraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_helper_carries_status_and_message() {
        let err = RostraError::api(200, "No choices in chat response");
        assert!(matches!(err, RostraError::Api { status: 200, .. }));
        assert_eq!(
            err.to_string(),
            "API error (status 200): No choices in chat response"
        );
    }

    #[test]
    fn tool_helper_names_the_failing_tool() {
        let err = RostraError::tool("calculator", "division by zero");
        assert_eq!(
            err.to_string(),
            "Tool execution error: calculator — division by zero"
        );
    }

    #[test]
    fn io_errors_convert_via_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: RostraError = io.into();
        assert!(matches!(err, RostraError::Io(_)));
    }
}
