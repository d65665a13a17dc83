use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::llm::{LlmClient, RetryPolicy};
use crate::pastel::{AnswerVector, DesignMatrix, FeatureModel, Pastel, PastelError, PastelResult};

use super::solver::{SolverOptions, least_squares};

/// One labelled sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub sentence: String,
    pub target: f64,
}

/// Held-out accuracy of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Root mean squared error over every example; unscored ones count with a prediction of 0.
    pub rmse: f64,
    pub examples: usize,
    /// Examples the scorer could answer.
    pub scored: usize,
}

/// Reads a header-less CSV of `sentence,target` rows.
pub fn load_examples(path: impl AsRef<Path>) -> PastelResult<Vec<TrainingExample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut examples = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        let (Some(sentence), Some(target)) = (record.get(0), record.get(1)) else {
            return Err(PastelError::TrainingData {
                row,
                reason: "expected a sentence and a target".to_string(),
            });
        };
        let target = target
            .trim()
            .parse::<f64>()
            .map_err(|e| PastelError::TrainingData {
                row,
                reason: format!("target '{target}' is not a number: {e}"),
            })?;
        examples.push(TrainingExample {
            sentence: sentence.to_string(),
            target,
        });
    }
    Ok(examples)
}

/// `||X·w - y||²`.
pub fn sum_squared_error(matrix: &DesignMatrix, weights: &[f64], targets: &[f64]) -> f64 {
    matrix
        .dot(weights)
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).powi(2))
        .sum()
}

/// Fits the model's weights to the labelled examples in `path` and writes them back.
///
/// Examples the scorer cannot answer are left out of the fit. Returns the weights in
/// column order.
#[instrument(skip(path, pastel), fields(path = %path.as_ref().display()))]
pub async fn learn_weights(path: impl AsRef<Path>, pastel: &mut Pastel) -> PastelResult<Vec<f64>> {
    let examples = load_examples(path.as_ref())?;
    let sentences: Vec<String> = examples.iter().map(|e| e.sentence.clone()).collect();
    let answers = pastel.get_answers_to_questions(&sentences).await;

    let (vectors, targets): (Vec<&AnswerVector>, Vec<f64>) = examples
        .iter()
        .filter_map(|e| answers.get(&e.sentence).map(|a| (a, e.target)))
        .unzip();
    if vectors.is_empty() {
        return Err(PastelError::TrainingData {
            row: 0,
            reason: "no training example could be answered".to_string(),
        });
    }
    if vectors.len() < examples.len() {
        warn!(
            dropped = examples.len() - vectors.len(),
            "Training without unanswerable examples"
        );
    }

    let matrix = pastel.quantify_answers(&vectors)?;
    let x0 = vec![1.0; matrix.n_cols()];
    let residuals = |w: &[f64]| -> Vec<f64> {
        matrix
            .dot(w)
            .iter()
            .zip(&targets)
            .map(|(p, t)| p - t)
            .collect()
    };
    let report = least_squares(residuals, &x0, &SolverOptions::default())?;

    info!(
        examples = matrix.n_rows(),
        sse = sum_squared_error(&matrix, &report.x, &targets),
        iterations = report.iterations,
        converged = report.converged,
        "Learned weights"
    );
    pastel.model_mut().set_weights(&report.x)?;
    Ok(report.x)
}

/// Scores held-out examples and reports their RMSE.
#[instrument(skip(path, pastel), fields(path = %path.as_ref().display()))]
pub async fn evaluate_weights(
    path: impl AsRef<Path>,
    pastel: &Pastel,
) -> PastelResult<EvaluationReport> {
    let examples = load_examples(path.as_ref())?;
    if examples.is_empty() {
        return Err(PastelError::TrainingData {
            row: 0,
            reason: "no evaluation examples".to_string(),
        });
    }
    let sentences: Vec<String> = examples.iter().map(|e| e.sentence.clone()).collect();
    let predictions = pastel.make_predictions(&sentences).await?;

    let mse = predictions
        .iter()
        .zip(&examples)
        .map(|(p, e)| (p.score - e.target).powi(2))
        .sum::<f64>()
        / examples.len() as f64;
    let report = EvaluationReport {
        rmse: mse.sqrt(),
        examples: examples.len(),
        scored: predictions.iter().filter(|p| p.is_scored()).count(),
    };
    info!(rmse = report.rmse, scored = report.scored, "RMS Error");
    Ok(report)
}

/// Builds a zeroed model from `features`, learns its weights and saves it to `out_path`.
pub async fn train_model<S: AsRef<str>>(
    training_csv: impl AsRef<Path>,
    features: &[S],
    out_path: impl AsRef<Path>,
    client: Arc<dyn LlmClient>,
    retry: RetryPolicy,
) -> PastelResult<FeatureModel> {
    let names: Vec<&str> = features.iter().map(|f| f.as_ref()).collect();
    let model = FeatureModel::from_feature_list(names)?;
    let mut pastel = Pastel::new(model, client).with_retry_policy(retry);
    learn_weights(training_csv, &mut pastel).await?;
    pastel.model().save(out_path)?;
    Ok(pastel.model().clone())
}
