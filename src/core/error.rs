//! Custom error types for Wayfarer
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Wayfarer operations
#[derive(Error, Debug)]
pub enum WayfarerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API credential is missing from both the environment and `.env`
    #[error("OpenAI API key not found. Please check your .env file.")]
    MissingApiKey,

    /// Chat-completions endpoint errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// A conversation run failed part-way through
    #[error("Conversation failed: {0}")]
    Conversation(String),

    /// An output capture is already redirecting the channel
    #[error("Output capture is already active on this channel")]
    CaptureActive,

    /// Rejected user input (empty destination, duration out of range)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transcript pattern compilation errors
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience Result type for Wayfarer operations
pub type Result<T> = std::result::Result<T, WayfarerError>;

impl WayfarerError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a conversation error
    pub fn conversation(msg: impl Into<String>) -> Self {
        Self::Conversation(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error stopped the run before any conversation started
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        let err = WayfarerError::MissingApiKey;
        assert!(err.to_string().contains(".env"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_conversation_is_not_configuration() {
        let err = WayfarerError::conversation("timeout");
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "Conversation failed: timeout");
    }
}
