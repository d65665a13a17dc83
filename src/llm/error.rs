use thiserror::Error;

/// Closed set of failure kinds reported by the LLM boundary.
///
/// Retry decisions are made on the kind, never on the concrete provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceErrorKind {
    /// Quota or rate limit hit.
    ResourceExhausted,
    /// Provider-side 500.
    InternalServerError,
    /// Provider temporarily unavailable (503 and friends).
    ServiceUnavailable,
    /// The call did not finish before its deadline.
    DeadlineExceeded,
    /// The provider answered but returned no text.
    NoOutput,
    /// Credentials missing or rejected.
    Unauthenticated,
    /// The request itself was rejected.
    InvalidRequest,
    /// Anything not classified above.
    Other,
}

impl ServiceErrorKind {
    /// Kinds worth retrying with backoff.
    pub const TRANSIENT: [ServiceErrorKind; 4] = [
        ServiceErrorKind::ResourceExhausted,
        ServiceErrorKind::InternalServerError,
        ServiceErrorKind::ServiceUnavailable,
        ServiceErrorKind::DeadlineExceeded,
    ];

    /// Returns `true` if this kind is in the transient whitelist.
    pub fn is_transient(&self) -> bool {
        Self::TRANSIENT.contains(self)
    }

    /// Short label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceErrorKind::ResourceExhausted => "resource_exhausted",
            ServiceErrorKind::InternalServerError => "internal_server_error",
            ServiceErrorKind::ServiceUnavailable => "service_unavailable",
            ServiceErrorKind::DeadlineExceeded => "deadline_exceeded",
            ServiceErrorKind::NoOutput => "no_output",
            ServiceErrorKind::Unauthenticated => "unauthenticated",
            ServiceErrorKind::InvalidRequest => "invalid_request",
            ServiceErrorKind::Other => "other",
        }
    }

    /// Classifies a provider error message by the status markers it carries.
    pub fn classify(message: &str) -> Self {
        let msg = message.to_lowercase();
        // status codes match whole tokens only
        let tokens: Vec<&str> = msg
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        let status = |codes: &[&str]| codes.iter().any(|c| tokens.contains(c));
        let has = |needles: &[&str]| needles.iter().any(|n| msg.contains(n));

        if status(&["429"])
            || has(&["resource_exhausted", "resource exhausted", "rate limit", "quota"])
        {
            ServiceErrorKind::ResourceExhausted
        } else if status(&["503"]) || has(&["unavailable", "overloaded"]) {
            ServiceErrorKind::ServiceUnavailable
        } else if status(&["504"]) || has(&["deadline", "timed out", "timeout"]) {
            ServiceErrorKind::DeadlineExceeded
        } else if status(&["500"]) || has(&["internal"]) {
            ServiceErrorKind::InternalServerError
        } else if status(&["401", "403"]) || has(&["unauthenticated", "permission", "api key"]) {
            ServiceErrorKind::Unauthenticated
        } else if status(&["400"]) || has(&["invalid"]) {
            ServiceErrorKind::InvalidRequest
        } else {
            ServiceErrorKind::Other
        }
    }
}

impl std::fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("LLM call failed ({kind}): {message}")]
/// Error returned by [`LlmClient`](super::LlmClient) implementations.
pub struct LlmError {
    /// Failure classification.
    pub kind: ServiceErrorKind,
    /// Provider message.
    pub message: String,
}

impl LlmError {
    /// Creates a new error of the given kind.
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns `true` if the kind is transient.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

/// Convenience result type for LLM calls.
pub type LlmResult<T> = Result<T, LlmError>;
