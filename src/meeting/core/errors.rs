//! Error types for the meeting summarizer.

use thiserror::Error;

/// Meeting summarizer error type.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The provider response could not be parsed, even after a repair attempt.
    #[error("failed to parse meeting summary JSON")]
    ParseFailure,
    /// The provider collaborator reported a failure.
    #[error("provider error: {0}")]
    Provider(String),
    /// HTTP client error from Rig.
    #[error("http client error: {0}")]
    HttpClient(#[from] rig::http_client::Error),
    /// Completion error.
    #[error("completion error: {0}")]
    Completion(#[from] rig::completion::CompletionError),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for summarizer operations.
pub type SummarizerResult<T> = Result<T, SummarizerError>;
