use crate::constants::BIAS_KEY;

use super::functions::PastelFunction;

/// One input to the linear model.
///
/// Identity is by value: a question by its exact text, a function by its registered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    /// Constant term, always valued 1.0.
    Bias,
    /// Yes/no question answered by the LLM.
    Question(String),
    /// Deterministic function of the sentence text.
    Function(PastelFunction),
}

impl Feature {
    /// Resolves a model-file key: `"bias"`, then registered function names, then question text.
    pub fn from_key(key: &str) -> Self {
        if key == BIAS_KEY {
            Feature::Bias
        } else if let Some(function) = PastelFunction::from_name(key) {
            Feature::Function(function)
        } else {
            Feature::Question(key.to_string())
        }
    }

    /// Key used in model files and answer maps.
    pub fn key(&self) -> &str {
        match self {
            Feature::Bias => BIAS_KEY,
            Feature::Question(text) => text,
            Feature::Function(function) => function.name(),
        }
    }

    pub fn is_bias(&self) -> bool {
        matches!(self, Feature::Bias)
    }

    pub fn as_question(&self) -> Option<&str> {
        match self {
            Feature::Question(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<PastelFunction> {
        match self {
            Feature::Function(function) => Some(*function),
            _ => None,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
