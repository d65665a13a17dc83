use thiserror::Error;

use crate::llm::LlmError;
use crate::parsing::ParsingError;

#[derive(Debug, Error)]
/// Topic detection errors.
pub enum TopicDetectionError {
    /// The keyword configuration does not have the expected shape.
    #[error("invalid keyword configuration: {reason}")]
    InvalidKeywords {
        /// Which rule failed.
        reason: String,
    },

    /// Keyword file could not be read.
    #[error("failed to read keywords: {0}")]
    Io(#[from] std::io::Error),

    /// Keyword file is not valid JSON for the expected layout.
    #[error("failed to decode keywords: {0}")]
    Json(#[from] serde_json::Error),

    /// The reply could not be turned into topic assignments, even after a fix-up call.
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    /// LLM boundary failure.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Terminal error after every attempt failed.
    #[error("Topic detection failed {attempts} times")]
    AttemptsExhausted {
        /// Attempts made.
        attempts: usize,
    },
}

/// Convenience result type for topic detection.
pub type TopicResult<T> = Result<T, TopicDetectionError>;
