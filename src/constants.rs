//! Cross-cutting, shared constants.
//!
//! Anything tunable at runtime is surfaced through [`crate::config::Config`]; these are the
//! defaults it falls back to.

/// Reserved model-file key for the bias term.
pub const BIAS_KEY: &str = "bias";

/// Whole-batch attempts before a terminal error is raised.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Attempts per individual LLM call (first try included).
pub const DEFAULT_CALL_ATTEMPTS: usize = 3;

/// Multiplier (seconds) of the randomized exponential backoff.
pub const DEFAULT_BACKOFF_MULTIPLIER_SECS: f64 = 1.0;

/// Upper bound (seconds) of a single backoff sleep.
pub const DEFAULT_BACKOFF_MAX_SECS: f64 = 60.0;

/// Deadline for one LLM call.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 120;

/// Similarity (0-100) a quote needs before it is linked to a sentence.
pub const DEFAULT_LINK_THRESHOLD: f64 = 80.0;

/// LLM used when `PASTEL_LLM_MODEL` is not set.
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";

/// Output token cap for every generation.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Answer value for "yes".
pub const ANSWER_YES: f64 = 1.0;
/// Answer value for "no".
pub const ANSWER_NO: f64 = 0.0;
/// Answer value for unsure, ambiguous or malformed tokens.
pub const ANSWER_UNSURE: f64 = 0.5;

/// Weight given to the injected country-exclusion question.
pub const COUNTRY_QUESTION_WEIGHT: f64 = -1.0;

/// System instruction sent with every prompt unless overridden.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a fact checker.
Ensure your answers are clear and correct.
Always return output in the requested format.
When asked to extract results from non-English text, return results in the original language, and don't translate them into English.";

/// Topic and scoring attempts used by the transcript pipelines.
pub const PIPELINE_MAX_ATTEMPTS: usize = 2;
