use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::parsing::ParsingError;

use super::error::{PastelError, PastelResult};
use super::feature::Feature;
use super::functions::PastelFunction;

/// Ordered feature → weight table with exactly one bias term.
///
/// Iteration order is stable and is the column order used everywhere else (design matrix,
/// weight vectors, model files).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureModel {
    entries: Vec<(Feature, f64)>,
}

impl FeatureModel {
    /// Builds a model from explicit entries, enforcing one bias and no duplicates.
    pub fn from_entries(entries: Vec<(Feature, f64)>) -> PastelResult<Self> {
        let bias_count = entries.iter().filter(|(f, _)| f.is_bias()).count();
        if bias_count != 1 {
            return Err(PastelError::configuration(format!(
                "model must contain exactly one bias term, found {bias_count}"
            )));
        }
        for (idx, (feature, _)) in entries.iter().enumerate() {
            if entries[..idx].iter().any(|(other, _)| other == feature) {
                return Err(PastelError::configuration(format!(
                    "duplicate feature '{feature}'"
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Builds an untrained model (all weights 0) from feature names, appending the bias.
    ///
    /// Names matching a registered function become [`Feature::Function`]; all others are
    /// questions.
    pub fn from_feature_list<I, S>(names: I) -> PastelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() {
                return Err(PastelError::configuration("feature names must not be empty"));
            }
            let feature = Feature::from_key(name);
            if feature.is_bias() {
                return Err(PastelError::configuration(
                    "feature list must not name the bias term",
                ));
            }
            entries.push((feature, 0.0));
        }
        entries.push((Feature::Bias, 0.0));
        Self::from_entries(entries)
    }

    /// Parses a model from its JSON object form.
    pub fn from_json_str(raw: &str) -> PastelResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(ParsingError::UnexpectedStructure {
                reason: "model file must be a JSON object".to_string(),
            }
            .into());
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, weight) in map {
            let weight = weight.as_f64().ok_or_else(|| ParsingError::UnexpectedStructure {
                reason: format!("weight for '{key}' is not a number"),
            })?;
            entries.push((Feature::from_key(&key), weight));
        }
        if !entries.iter().any(|(f, _)| f.is_bias()) {
            return Err(ParsingError::UnexpectedStructure {
                reason: "model file has no bias term".to_string(),
            }
            .into());
        }
        Self::from_entries(entries)
    }

    /// Loads a model file written by [`FeatureModel::save`].
    pub fn load(path: impl AsRef<Path>) -> PastelResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let model = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), features = model.len(), "Loaded feature model");
        Ok(model)
    }

    /// JSON object form, keys in column order.
    pub fn to_json_value(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(feature, weight)| (feature.key().to_string(), Value::from(*weight)))
            .collect();
        Value::Object(map)
    }

    /// Writes the model as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> PastelResult<()> {
        let path = path.as_ref();
        let body = serde_json::to_string_pretty(&self.to_json_value())?;
        std::fs::write(path, body)?;
        debug!(path = %path.display(), features = self.len(), "Saved feature model");
        Ok(())
    }

    /// Returns a copy with `question` appended at `weight`.
    pub fn with_question(&self, question: impl Into<String>, weight: f64) -> PastelResult<Self> {
        let mut entries = self.entries.clone();
        entries.push((Feature::Question(question.into()), weight));
        Self::from_entries(entries)
    }

    pub fn bias(&self) -> f64 {
        self.weight(&Feature::Bias).unwrap_or_default()
    }

    /// Question texts in column order.
    pub fn questions(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|(f, _)| f.as_question())
            .collect()
    }

    /// Registered functions in column order.
    pub fn functions(&self) -> Vec<PastelFunction> {
        self.entries
            .iter()
            .filter_map(|(f, _)| f.as_function())
            .collect()
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.entries.iter().map(|(f, _)| f)
    }

    pub fn entries(&self) -> &[(Feature, f64)] {
        &self.entries
    }

    pub fn weight(&self, feature: &Feature) -> Option<f64> {
        self.entries
            .iter()
            .find(|(f, _)| f == feature)
            .map(|(_, w)| *w)
    }

    /// Weights in column order.
    pub fn weights(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, w)| *w).collect()
    }

    /// Replaces every weight, in column order.
    pub fn set_weights(&mut self, weights: &[f64]) -> PastelResult<()> {
        if weights.len() != self.entries.len() {
            return Err(PastelError::DimensionMismatch {
                expected: self.entries.len(),
                actual: weights.len(),
            });
        }
        for ((_, slot), weight) in self.entries.iter_mut().zip(weights) {
            *slot = *weight;
        }
        Ok(())
    }

    /// A model whose weights are all zero has never been trained.
    pub fn is_untrained(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
