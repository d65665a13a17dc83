//! PASTEL checkworthiness scoring.
//!
//! A sentence is scored by a linear model over feature values: LLM answers to yes/no
//! questions (yes = 1, no = 0, anything else = 0.5), deterministic functions of the text,
//! and a constant bias.
//!
//! # Pipeline
//!
//! 1. [`FeatureModel`] fixes the feature order and weights.
//! 2. [`Pastel`] asks every question of every sentence concurrently, one call per sentence.
//! 3. Answers become a [`DesignMatrix`] and each row is dotted with the weights.
//! 4. [`CheckworthyClaimDetector`] adds whole-batch retry and the optional country question.
//!
//! Sentences whose call keeps failing are scored 0.0 with no answers instead of failing
//! the batch.

pub mod detector;
pub mod error;
pub mod feature;
pub mod functions;
pub mod model;
pub mod prompt;
pub mod scorer;
pub mod types;


pub use detector::{
    CheckworthyClaimDetector, DetectorConfig, country_question, expand_country_aliases,
};
pub use error::{PastelError, PastelResult};
pub use feature::Feature;
pub use functions::PastelFunction;
pub use model::FeatureModel;
pub use prompt::{build_prompt, parse_answer_line, parse_response};
pub use scorer::{AnswerCollection, Pastel};
pub use types::{AnswerVector, DesignMatrix, FailureKind, ScoredSentence};
