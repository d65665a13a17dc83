use serde::{Deserialize, Serialize};

/// Score and topics for one input sentence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckworthyResult {
    /// Checkworthiness, or 0.0 when the sentence was not scored.
    pub score: f64,
    pub topics: Vec<String>,
}
