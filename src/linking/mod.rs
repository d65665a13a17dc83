//! Fuzzy quote-to-sentence linking.
//!
//! LLM-extracted quotes rarely match the source verbatim (case, punctuation, small
//! rewrites), so each quote is aligned against every candidate sentence and linked to the
//! closest one that clears a similarity threshold. A quote links to at most one sentence;
//! a sentence may receive many quotes.

pub mod fuzz;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use fuzz::{ScoreAlignment, indel_ratio, partial_ratio_alignment};

fn whole_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    indel_ratio(&a, &b)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteMatch {
    pub sentence_idx: usize,
    pub span: Span,
    // indel ratio of quote and whole sentence, 0-100
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLink {
    pub quote_idx: usize,
    pub sentence_idx: usize,
    pub span: Span,
}

/// Locates `quote` inside `sentence`, case-insensitively.
///
/// Returns `None` when the partial alignment scores below `threshold` (0-100). When the
/// quote is longer than the sentence the span covers the whole sentence.
pub fn find_quote_in_sentence(sentence: &str, quote: &str, threshold: f64) -> Option<Span> {
    let alignment = partial_ratio_alignment(&quote.to_lowercase(), &sentence.to_lowercase())?;
    if alignment.score < threshold {
        return None;
    }
    let text = sentence
        .chars()
        .skip(alignment.dest_start)
        .take(alignment.dest_end.saturating_sub(alignment.dest_start))
        .collect();
    Some(Span {
        start: alignment.dest_start,
        end: alignment.dest_end,
        text,
    })
}

/// Picks the sentence containing `quote` that is most similar to it as a whole.
pub fn get_best_matching_sentence_for_quote<S: AsRef<str>>(
    quote: &str,
    sentences: &[S],
    threshold: f64,
) -> Option<QuoteMatch> {
    let mut best: Option<QuoteMatch> = None;
    for (sentence_idx, sentence) in sentences.iter().enumerate() {
        let sentence = sentence.as_ref();
        let Some(span) = find_quote_in_sentence(sentence, quote, threshold) else {
            continue;
        };
        let similarity = whole_ratio(quote, sentence);
        if best.as_ref().is_none_or(|b| similarity > b.similarity) {
            best = Some(QuoteMatch {
                sentence_idx,
                span,
                similarity,
            });
        }
    }
    if best.is_none() {
        let preview: String = quote.chars().take(100).collect();
        debug!(quote = %preview, "No matches found for quote");
    }
    best
}

pub fn link_quotes_and_sentences<Q: AsRef<str>, S: AsRef<str>>(
    quotes: &[Q],
    sentences: &[S],
    threshold: f64,
) -> Vec<QuoteLink> {
    quotes
        .iter()
        .enumerate()
        .filter_map(|(quote_idx, quote)| {
            get_best_matching_sentence_for_quote(quote.as_ref(), sentences, threshold).map(|m| {
                QuoteLink {
                    quote_idx,
                    sentence_idx: m.sentence_idx,
                    span: m.span,
                }
            })
        })
        .collect()
}
