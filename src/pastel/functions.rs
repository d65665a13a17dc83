//! Registry of deterministic feature functions.
//!
//! Functions are referenced by name in model files, so the registry is closed: adding a
//! function means adding a variant here.

/// A registered sentence-to-score function. Every function returns a value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PastelFunction {
    /// 1.0 when the sentence is shorter than 30 characters.
    IsShort,
    /// 1.0 when the sentence contains a digit.
    HasNumber,
    /// 1.0 when the sentence is phrased as a question.
    IsQuestion,
}

const SHORT_SENTENCE_CHARS: usize = 30;

impl PastelFunction {
    /// Every registered function.
    pub const ALL: [PastelFunction; 3] = [
        PastelFunction::IsShort,
        PastelFunction::HasNumber,
        PastelFunction::IsQuestion,
    ];

    pub fn all() -> &'static [PastelFunction] {
        &Self::ALL
    }

    /// Registered (serialized) name.
    pub fn name(&self) -> &'static str {
        match self {
            PastelFunction::IsShort => "is_short",
            PastelFunction::HasNumber => "has_number",
            PastelFunction::IsQuestion => "is_question",
        }
    }

    /// Looks a function up by its exact registered name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Evaluates the function on `text`.
    pub fn evaluate(&self, text: &str) -> f64 {
        let hit = match self {
            PastelFunction::IsShort => text.chars().count() < SHORT_SENTENCE_CHARS,
            PastelFunction::HasNumber => text.chars().any(|c| c.is_ascii_digit()),
            PastelFunction::IsQuestion => text.trim_end().ends_with('?'),
        };
        if hit { 1.0 } else { 0.0 }
    }
}

impl std::fmt::Display for PastelFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
