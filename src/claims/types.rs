use serde::{Deserialize, Serialize};

/// A claim as extracted from text, before it is placed in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextClaim {
    /// The claim, rephrased to stand on its own.
    pub claim: String,
    /// The source sentence containing the claim, verbatim.
    pub original_text: String,
}
