use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
/// Malformed model output.
pub enum ParsingError {
    /// Nothing resembling JSON could be recovered.
    #[error("could not parse model output as JSON: {snippet}")]
    NotJson {
        /// Leading part of the offending output.
        snippet: String,
    },

    /// JSON was recovered but has the wrong shape.
    #[error("unexpected JSON structure: {reason}")]
    UnexpectedStructure {
        /// What was expected.
        reason: String,
    },

    /// Line-structured answers did not line up with the questions asked.
    #[error("expected {expected} answer lines, got {actual}: {output}")]
    LineCountMismatch {
        /// Number of questions.
        expected: usize,
        /// Number of lines in the reply.
        actual: usize,
        /// The reply after narration stripping.
        output: String,
    },

    /// A single answer line had no answer token.
    #[error("answer line has no answer token: '{line}'")]
    MissingAnswerToken {
        /// The offending line.
        line: String,
    },
}

impl ParsingError {
    pub(crate) fn not_json(raw: &str) -> Self {
        ParsingError::NotJson {
            snippet: raw.chars().take(120).collect(),
        }
    }
}

/// Convenience result type for parsing.
pub type ParsingResult<T> = Result<T, ParsingError>;
