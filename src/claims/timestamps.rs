use crate::linking::{QuoteLink, link_quotes_and_sentences};
use crate::transcript::TranscriptSentence;

/// Start time for each of `num_quotes` quotes given their links into `sentences`.
///
/// An unlinked quote inherits the most recent resolved timestamp in quote order. Before
/// anything resolves it gets the first sentence's start, or 0.0 for an empty transcript.
pub fn timestamps_from_links(
    links: &[QuoteLink],
    num_quotes: usize,
    sentences: &[TranscriptSentence],
) -> Vec<f64> {
    let mut resolved: Vec<Option<f64>> = vec![None; num_quotes];
    for link in links {
        if let (Some(slot), Some(sentence)) =
            (resolved.get_mut(link.quote_idx), sentences.get(link.sentence_idx))
        {
            *slot = Some(sentence.start_time_s);
        }
    }

    let mut last = sentences.first().map_or(0.0, |s| s.start_time_s);
    resolved
        .into_iter()
        .map(|ts| {
            if let Some(ts) = ts {
                last = ts;
            }
            last
        })
        .collect()
}

/// Links `quotes` to `sentences` and returns one start time per quote.
pub fn attach_timestamps<Q: AsRef<str>>(
    quotes: &[Q],
    sentences: &[TranscriptSentence],
    threshold: f64,
) -> Vec<f64> {
    let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
    let links = link_quotes_and_sentences(quotes, &texts, threshold);
    timestamps_from_links(&links, quotes.len(), sentences)
}
