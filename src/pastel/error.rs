use thiserror::Error;

use crate::llm::{LlmError, ServiceErrorKind};
use crate::parsing::ParsingError;

#[derive(Debug, Error)]
/// Errors raised by the PASTEL model, scorer and weight learner.
pub enum PastelError {
    /// The model definition is inconsistent (missing/duplicate bias, duplicate feature).
    #[error("configuration error: {reason}")]
    Configuration {
        /// What is wrong.
        reason: String,
    },

    /// Model output or a model file had the wrong structure.
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    /// Every weight is zero; the model must be trained first.
    #[error("must train weights before predicting")]
    UntrainedModel,

    /// An answer vector lacks a feature the model expects.
    #[error("answers are missing feature '{feature}'")]
    MissingAnswer {
        /// Key of the missing feature.
        feature: String,
    },

    /// Weight vector length does not match the model.
    #[error("expected {expected} weights, got {actual}")]
    DimensionMismatch {
        /// Number of features in the model.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// LLM boundary failure.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Every sentence in a batch failed the same batch-wide way (e.g. credentials).
    #[error("whole batch failed: {kind}")]
    BatchFailed {
        /// Shared failure kind.
        kind: ServiceErrorKind,
    },

    /// Model or training file I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model file is not JSON.
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Training CSV could not be read.
    #[error("training data error: {0}")]
    Csv(#[from] csv::Error),

    /// Training CSV row is malformed.
    #[error("training data row {row}: {reason}")]
    TrainingData {
        /// 1-based row number.
        row: usize,
        /// What is wrong.
        reason: String,
    },

    /// Least-squares solve failed.
    #[error("least-squares solve failed: {reason}")]
    Solver {
        /// What went wrong.
        reason: String,
    },

    /// Terminal error after the whole-batch retry budget is spent.
    #[error("Pastel failed {attempts} times")]
    AttemptsExhausted {
        /// Attempts made.
        attempts: usize,
    },
}

impl PastelError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        PastelError::Configuration {
            reason: reason.into(),
        }
    }

    /// Returns `true` for per-call failures worth retrying: transient service kinds and
    /// malformed replies.
    pub fn is_retryable(&self) -> bool {
        match self {
            PastelError::Llm(e) => e.is_transient(),
            PastelError::Parsing(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if retrying the whole batch cannot help.
    pub fn is_deterministic(&self) -> bool {
        matches!(
            self,
            PastelError::UntrainedModel
                | PastelError::Configuration { .. }
                | PastelError::DimensionMismatch { .. }
                | PastelError::MissingAnswer { .. }
        )
    }
}

/// Convenience result type for PASTEL operations.
pub type PastelResult<T> = Result<T, PastelError>;
