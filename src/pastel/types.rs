use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::llm::ServiceErrorKind;

use super::error::PastelError;
use super::feature::Feature;

/// Every feature value for one sentence, bias included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerVector {
    values: HashMap<Feature, f64>,
}

impl AnswerVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: Feature, value: f64) {
        self.values.insert(feature, value);
    }

    pub fn get(&self, feature: &Feature) -> Option<f64> {
        self.values.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// String-keyed copy without the bias column, suitable for output and metadata.
    pub fn to_plain(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .filter(|(f, _)| !f.is_bias())
            .map(|(f, v)| (f.key().to_string(), *v))
            .collect()
    }
}

impl FromIterator<(Feature, f64)> for AnswerVector {
    fn from_iter<T: IntoIterator<Item = (Feature, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Why a sentence ended up without answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The LLM call failed with this kind after retries.
    Llm(ServiceErrorKind),
    /// The reply never parsed.
    Parsing,
    /// Anything else.
    Other,
}

impl From<&PastelError> for FailureKind {
    fn from(err: &PastelError) -> Self {
        match err {
            PastelError::Llm(e) => FailureKind::Llm(e.kind),
            PastelError::Parsing(_) => FailureKind::Parsing,
            _ => FailureKind::Other,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Llm(kind) => write!(f, "{kind}"),
            FailureKind::Parsing => f.write_str("parsing"),
            FailureKind::Other => f.write_str("other"),
        }
    }
}

/// Rows are sentences, columns follow the model's feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    rows: Vec<Vec<f64>>,
    cols: usize,
}

impl DesignMatrix {
    pub fn new(cols: usize) -> Self {
        Self {
            rows: Vec::new(),
            cols,
        }
    }

    pub fn push_row(&mut self, row: Vec<f64>) -> Result<(), PastelError> {
        if row.len() != self.cols {
            return Err(PastelError::DimensionMismatch {
                expected: self.cols,
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Values of column `idx`, or `None` past the last column.
    pub fn column(&self, idx: usize) -> Option<Vec<f64>> {
        if idx >= self.cols {
            return None;
        }
        self.rows.iter().map(|r| r.get(idx).copied()).collect()
    }

    /// Matrix-vector product `X · w`.
    pub fn dot(&self, weights: &[f64]) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.iter().zip(weights).map(|(x, w)| x * w).sum())
            .collect()
    }
}

/// Final per-sentence output of the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSentence {
    pub sentence: String,
    /// Checkworthiness; 0.0 when the sentence could not be scored.
    pub score: f64,
    /// Feature values without the bias, or `None` when the sentence failed.
    pub answers: Option<BTreeMap<String, f64>>,
}

impl ScoredSentence {
    pub fn unscored(sentence: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            score: 0.0,
            answers: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.answers.is_some()
    }
}
