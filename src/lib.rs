//! PASTEL checkworthiness library crate (used by the `checkworthy` binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Scoring
//! - [`FeatureModel`], [`Feature`], [`PastelFunction`] - Weighted feature model and its file format
//! - [`Pastel`] - Concurrent per-sentence question answering and scoring
//! - [`CheckworthyClaimDetector`], [`DetectorConfig`] - Whole-batch retry and the country question
//! - [`country_names_from_codes`] - ISO alpha-3 codes to country names
//!
//! ## Training
//! - [`train_model`], [`learn_weights`], [`evaluate_weights`] - Least-squares weight fitting
//!
//! ## Text Plumbing
//! - [`TopicKeywordFilter`] - Keyword-guided topic assignment per article
//! - [`ClaimExtractor`] - Claim extraction from transcripts
//! - [`link_quotes_and_sentences`] - Fuzzy quote-to-sentence linking
//!
//! ## Pipelines
//! - [`run_checkworthy`], [`get_transcript_claims`], [`search_transcript`]
//! - [`detector_for_country_codes`]
//!
//! ## LLM Boundary
//! - [`LlmClient`], [`GenaiClient`], [`RetryPolicy`]
//!
//! ## Test/Mock Support
//! [`MockLlmClient`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod claims;
pub mod config;
pub mod constants;
pub mod countries;
pub mod linking;
pub mod llm;
pub mod parsing;
pub mod pastel;
pub mod pipeline;
pub mod topics;
pub mod training;
pub mod transcript;

pub use claims::{ClaimExtractionError, ClaimExtractor, TextClaim, attach_timestamps};
pub use config::{Config, ConfigError};
pub use countries::{CountryError, country_names_from_codes};
pub use linking::{
    QuoteLink, QuoteMatch, Span, find_quote_in_sentence, get_best_matching_sentence_for_quote,
    link_quotes_and_sentences,
};
#[cfg(any(test, feature = "mock"))]
pub use llm::MockLlmClient;
pub use llm::{GenaiClient, LlmClient, LlmError, LlmRequest, RetryPolicy, ServiceErrorKind};
pub use parsing::{ParsingError, parse_model_json_output};
pub use pastel::{
    AnswerVector, CheckworthyClaimDetector, DetectorConfig, Feature, FeatureModel, Pastel,
    PastelError, PastelFunction, PastelResult, ScoredSentence,
};
pub use pipeline::{
    CheckworthyError, CheckworthyResult, detector_for_country_codes, get_transcript_claims,
    run_checkworthy, search_transcript,
};
pub use topics::{AllKeywords, KeywordMap, TopicDetectionError, TopicKeywordFilter};
pub use training::{EvaluationReport, evaluate_weights, learn_weights, train_model};
pub use transcript::{TranscriptSentence, VideoClaims};
