use thiserror::Error;

use crate::llm::LlmError;
use crate::parsing::ParsingError;

#[derive(Debug, Error)]
/// Claim extraction errors.
pub enum ClaimExtractionError {
    /// Reply was not a list of claims, even after a fix-up call.
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    /// LLM boundary failure.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Terminal error after every attempt failed.
    #[error("Claim extraction failed {attempts} times")]
    AttemptsExhausted {
        /// Attempts made.
        attempts: usize,
    },
}

/// Convenience result type for claim extraction.
pub type ClaimResult<T> = Result<T, ClaimExtractionError>;
