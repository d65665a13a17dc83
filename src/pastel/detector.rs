use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::constants::{COUNTRY_QUESTION_WEIGHT, DEFAULT_MAX_ATTEMPTS};
use crate::countries::{CountryResult, country_names_from_codes};
use crate::llm::{LlmClient, RetryPolicy};

use super::error::{PastelError, PastelResult};
use super::model::FeatureModel;
use super::scorer::Pastel;
use super::types::ScoredSentence;

/// Construction parameters for [`CheckworthyClaimDetector`].
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Trained checkworthy model file.
    pub model_path: PathBuf,
    /// When set, sentences about these countries are scored down.
    pub countries: Option<Vec<String>>,
    /// Per-call retry policy.
    pub retry: RetryPolicy,
    /// Whole-batch attempts used by [`CheckworthyClaimDetector::score`].
    pub max_attempts: usize,
}

impl DetectorConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            countries: None,
            retry: RetryPolicy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_countries(mut self, countries: Vec<String>) -> Self {
        self.countries = Some(countries);
        self
    }

    /// Same as [`Self::with_countries`], from ISO alpha-3 codes such as `GBR`.
    pub fn with_country_codes<S: AsRef<str>>(self, codes: &[S]) -> CountryResult<Self> {
        Ok(self.with_countries(country_names_from_codes(codes)?))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Adds the usual aliases for the UK and the US so the country question matches them too.
pub fn expand_country_aliases(countries: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = countries.to_vec();
    let mut extend = |aliases: &[&str]| {
        for alias in aliases {
            if !expanded.iter().any(|c| c == alias) {
                expanded.push((*alias).to_string());
            }
        }
    };
    if countries.iter().any(|c| c == "United Kingdom") {
        extend(&["England", "Wales", "Scotland", "Northern Ireland", "Britain", "UK"]);
    }
    if countries.iter().any(|c| c == "United States") {
        extend(&["America", "USA"]);
    }
    expanded
}

/// Question that answers "yes" only for sentences about a country outside `countries`.
pub fn country_question(countries: &[String]) -> String {
    let listing = format!("[{}]", countries.join(", "));
    format!(
        "Identify any country named in the sentence, ignoring cities, regions and other places. \
         If this sentence mentions any country in this list: {listing} answer 'no'. \
         If it doesn't name any country at all then also answer 'no'. \
         If you're not sure, answer 'no'. \
         Only answer 'yes' if it mentions or is clearly about some other country not on that list. "
    )
}

/// Checkworthiness scorer over a trained model, with whole-batch retry.
#[derive(Debug)]
pub struct CheckworthyClaimDetector {
    pastel: Pastel,
    max_attempts: usize,
}

impl CheckworthyClaimDetector {
    /// Loads the model named by `config` and injects the country question if requested.
    pub fn new(config: DetectorConfig, client: Arc<dyn LlmClient>) -> PastelResult<Self> {
        let model = FeatureModel::load(&config.model_path)?;
        let model = match &config.countries {
            Some(countries) if !countries.is_empty() => {
                let countries = expand_country_aliases(countries);
                model.with_question(country_question(&countries), COUNTRY_QUESTION_WEIGHT)?
            }
            _ => model,
        };
        info!(
            path = %config.model_path.display(),
            features = model.len(),
            "Checkworthy detector ready"
        );
        Ok(Self {
            pastel: Pastel::new(model, client).with_retry_policy(config.retry),
            max_attempts: config.max_attempts.max(1),
        })
    }

    /// Wraps an already-built scorer.
    pub fn from_pastel(pastel: Pastel, max_attempts: usize) -> Self {
        Self {
            pastel,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn pastel(&self) -> &Pastel {
        &self.pastel
    }

    /// Scores with the configured number of whole-batch attempts.
    pub async fn score(&self, sentences: &[String]) -> PastelResult<Vec<ScoredSentence>> {
        self.score_sentences(sentences, self.max_attempts).await
    }

    /// Scores every sentence, retrying the whole batch up to `max_attempts` times.
    ///
    /// Deterministic failures (untrained model, inconsistent answers) are returned as-is.
    #[instrument(skip(self, sentences), fields(num_sentences = sentences.len()))]
    pub async fn score_sentences(
        &self,
        sentences: &[String],
        max_attempts: usize,
    ) -> PastelResult<Vec<ScoredSentence>> {
        let max_attempts = max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let collection = self.pastel.collect_answers(sentences).await;
            let outcome = match collection.batch_failure() {
                Some(kind) => Err(PastelError::BatchFailed { kind }),
                None => self.pastel.score_collection(sentences, &collection),
            };
            match outcome {
                Ok(scores) => return Ok(scores),
                Err(err) if err.is_deterministic() => return Err(err),
                Err(err) => info!(attempt, error = %err, "Error while running Pastel"),
            }
        }
        Err(PastelError::AttemptsExhausted {
            attempts: max_attempts,
        })
    }
}
