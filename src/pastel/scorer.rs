use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::llm::{LlmClient, LlmRequest, RetryPolicy, ServiceErrorKind};

use super::error::{PastelError, PastelResult};
use super::feature::Feature;
use super::model::FeatureModel;
use super::prompt;
use super::types::{AnswerVector, DesignMatrix, FailureKind, ScoredSentence};

/// Outcome of one fan-out: answers for sentences that made it, failure kinds for the rest.
#[derive(Debug, Default, Clone)]
pub struct AnswerCollection {
    pub answers: HashMap<String, AnswerVector>,
    pub failures: HashMap<String, FailureKind>,
}

impl AnswerCollection {
    /// Returns the shared kind when every sentence failed on missing or rejected credentials.
    pub fn batch_failure(&self) -> Option<ServiceErrorKind> {
        let auth = FailureKind::Llm(ServiceErrorKind::Unauthenticated);
        if self.answers.is_empty()
            && !self.failures.is_empty()
            && self.failures.values().all(|k| *k == auth)
        {
            Some(ServiceErrorKind::Unauthenticated)
        } else {
            None
        }
    }
}

/// Concurrent PASTEL scorer.
///
/// One LLM call per distinct sentence, all in flight at once; each call is retried on its
/// own. A sentence that still fails is scored 0.0 rather than failing the batch.
pub struct Pastel {
    model: FeatureModel,
    client: Arc<dyn LlmClient>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for Pastel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pastel")
            .field("features", &self.model.len())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Pastel {
    pub fn new(model: FeatureModel, client: Arc<dyn LlmClient>) -> Self {
        Self {
            model,
            client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &FeatureModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut FeatureModel {
        &mut self.model
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn make_prompt(&self, sentence: &str) -> String {
        prompt::build_prompt(sentence, &self.model.questions())
    }

    async fn answers_once(&self, sentence: &str) -> PastelResult<AnswerVector> {
        let questions = self.model.questions();
        let mut answers = AnswerVector::new();

        if !questions.is_empty() {
            let request = LlmRequest::new(prompt::build_prompt(sentence, &questions));
            let raw = self.client.run_prompt(request).await?;
            for (question, value) in prompt::parse_response(&raw, &questions)? {
                answers.insert(Feature::Question(question.to_string()), value);
            }
        }
        for function in self.model.functions() {
            answers.insert(Feature::Function(function), function.evaluate(sentence));
        }
        Ok(answers)
    }

    pub async fn answer_sentence(&self, sentence: &str) -> Result<AnswerVector, FailureKind> {
        self.retry
            .run("pastel_answers", || self.answers_once(sentence), PastelError::is_retryable)
            .await
            .map_err(|err| {
                warn!(sentence, error = %err, "Giving up on sentence");
                FailureKind::from(&err)
            })
    }

    /// Fans out one task per distinct sentence and keeps successes and failures apart.
    #[instrument(skip(self, sentences), fields(sentences = sentences.len()))]
    pub async fn collect_answers(&self, sentences: &[String]) -> AnswerCollection {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = sentences
            .iter()
            .map(String::as_str)
            .filter(|s| seen.insert(*s))
            .collect();

        let outcomes = join_all(unique.iter().map(|sentence| async move {
            (*sentence, self.answer_sentence(sentence).await)
        }))
        .await;

        let mut collection = AnswerCollection::default();
        for (sentence, outcome) in outcomes {
            match outcome {
                Ok(answers) => {
                    collection.answers.insert(sentence.to_string(), answers);
                }
                Err(kind) => {
                    collection.failures.insert(sentence.to_string(), kind);
                }
            }
        }
        info!(
            answered = collection.answers.len(),
            failed = collection.failures.len(),
            "Collected PASTEL answers"
        );
        collection
    }

    pub async fn get_answers_to_questions(
        &self,
        sentences: &[String],
    ) -> HashMap<String, AnswerVector> {
        self.collect_answers(sentences).await.answers
    }

    /// Builds the design matrix, one row per answer vector, bias column forced to 1.0.
    pub fn quantify_answers(&self, answers: &[&AnswerVector]) -> PastelResult<DesignMatrix> {
        let mut matrix = DesignMatrix::new(self.model.len());
        for answer in answers {
            let row = self
                .model
                .features()
                .map(|feature| match feature {
                    Feature::Bias => Ok(1.0),
                    other => answer.get(other).ok_or_else(|| PastelError::MissingAnswer {
                        feature: other.key().to_string(),
                    }),
                })
                .collect::<PastelResult<Vec<f64>>>()?;
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    pub fn get_scores_from_answers(&self, answers: &[&AnswerVector]) -> PastelResult<Vec<f64>> {
        if self.model.is_untrained() {
            return Err(PastelError::UntrainedModel);
        }
        let matrix = self.quantify_answers(answers)?;
        Ok(matrix.dot(&self.model.weights()))
    }

    pub fn score_collection(
        &self,
        sentences: &[String],
        collection: &AnswerCollection,
    ) -> PastelResult<Vec<ScoredSentence>> {
        let answered: Vec<(&String, &AnswerVector)> = collection.answers.iter().collect();
        let vectors: Vec<&AnswerVector> = answered.iter().map(|(_, a)| *a).collect();
        let scores: HashMap<&str, f64> = if vectors.is_empty() {
            HashMap::new()
        } else {
            answered
                .iter()
                .map(|(s, _)| s.as_str())
                .zip(self.get_scores_from_answers(&vectors)?)
                .collect()
        };

        Ok(sentences
            .iter()
            .map(|sentence| match (scores.get(sentence.as_str()), collection.answers.get(sentence)) {
                (Some(score), Some(answers)) => ScoredSentence {
                    sentence: sentence.clone(),
                    score: *score,
                    answers: Some(answers.to_plain()),
                },
                _ => ScoredSentence::unscored(sentence.clone()),
            })
            .collect())
    }

    /// Scores every sentence; unanswerable sentences get 0.0 and no answers.
    #[instrument(skip(self, sentences), fields(sentences = sentences.len()))]
    pub async fn make_predictions(&self, sentences: &[String]) -> PastelResult<Vec<ScoredSentence>> {
        let collection = self.collect_answers(sentences).await;
        let predictions = self.score_collection(sentences, &collection)?;
        debug!(predictions = predictions.len(), "Scored sentences");
        Ok(predictions)
    }
}
