use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use crate::constants::DEFAULT_LINK_THRESHOLD;
use crate::linking::link_quotes_and_sentences;
use crate::llm::{LlmClient, LlmRequest};
use crate::parsing::{ParsingError, ParsingResult, parse_model_json_output};
use crate::transcript::{TranscriptSentence, VideoClaims};

use super::error::{ClaimExtractionError, ClaimResult};
use super::prompts::{CLAIMS_PROMPT_TEXT, FIX_CLAIMS_JSON, claims_schema};
use super::timestamps::timestamps_from_links;
use super::types::TextClaim;

/// Pulls the main claims out of a transcript and places them back on its timeline.
pub struct ClaimExtractor {
    client: Arc<dyn LlmClient>,
    link_threshold: f64,
}

impl std::fmt::Debug for ClaimExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimExtractor")
            .field("link_threshold", &self.link_threshold)
            .finish_non_exhaustive()
    }
}

impl ClaimExtractor {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            link_threshold: DEFAULT_LINK_THRESHOLD,
        }
    }

    /// Similarity (0-100) a claim's source text needs to be linked to a sentence.
    pub fn with_link_threshold(mut self, threshold: f64) -> Self {
        self.link_threshold = threshold;
        self
    }

    pub fn link_threshold(&self) -> f64 {
        self.link_threshold
    }

    pub fn make_prompt<S: AsRef<str>>(texts: &[S]) -> String {
        let joined = texts.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join(" ");
        CLAIMS_PROMPT_TEXT.replace("{TEXT}", &joined)
    }

    /// Parses a reply into claims. Anything other than a list of `{claim, original_text}`
    /// objects is rejected.
    pub fn parse_claims(response: &str) -> ParsingResult<Vec<TextClaim>> {
        let Value::Array(items) = parse_model_json_output(response)? else {
            return Err(ParsingError::UnexpectedStructure {
                reason: "expected a list of claims".to_string(),
            });
        };
        items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|e| ParsingError::UnexpectedStructure {
                    reason: format!("invalid claim: {e}"),
                })
            })
            .collect()
    }

    async fn extract_once(&self, prompt: &str) -> ClaimResult<Vec<TextClaim>> {
        let request = LlmRequest::new(prompt).with_output_schema(claims_schema());
        let response = self.client.run_prompt(request).await?;
        match Self::parse_claims(&response) {
            Ok(claims) => Ok(claims),
            Err(err) => {
                info!(error = %err, "Parsing error, requesting fixed JSON");
                let fix = FIX_CLAIMS_JSON.replace("{INPUT_TEXT}", &response);
                let fixed = self.client.run_prompt(LlmRequest::new(fix)).await?;
                Ok(Self::parse_claims(&fixed)?)
            }
        }
    }

    /// Extracts claims from `texts`, making up to two calls per attempt.
    #[instrument(skip(self, texts), fields(num_texts = texts.len()))]
    pub async fn extract_text_claims<S: AsRef<str>>(
        &self,
        texts: &[S],
        max_attempts: usize,
    ) -> ClaimResult<Vec<TextClaim>> {
        let prompt = Self::make_prompt(texts);
        let max_attempts = max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.extract_once(&prompt).await {
                Ok(claims) => {
                    debug!(attempt, claims = claims.len(), "Claims extracted");
                    return Ok(claims);
                }
                Err(err) => info!(attempt, error = %err, "Error raised while extracting claims"),
            }
        }
        Err(ClaimExtractionError::AttemptsExhausted {
            attempts: max_attempts,
        })
    }

    /// Extracts claims from a transcript and timestamps each one from the sentence its
    /// source text links to.
    ///
    /// An empty transcript yields no claims without calling the model.
    pub async fn extract_claims_from_transcript(
        &self,
        transcript: &[TranscriptSentence],
        max_attempts: usize,
    ) -> ClaimResult<Vec<VideoClaims>> {
        let Some(first) = transcript.first() else {
            return Ok(Vec::new());
        };
        let video_id = first.video_id;

        let texts: Vec<&str> = transcript.iter().map(|s| s.text.as_str()).collect();
        let claims = self.extract_text_claims(&texts, max_attempts).await?;

        let quotes: Vec<&str> = claims.iter().map(|c| c.original_text.as_str()).collect();
        let links = link_quotes_and_sentences(&quotes, &texts, self.link_threshold);
        let timestamps = timestamps_from_links(&links, claims.len(), transcript);

        let mut spans: Vec<Value> = vec![Value::Null; claims.len()];
        for link in &links {
            if let (Some(slot), Some(sentence)) =
                (spans.get_mut(link.quote_idx), transcript.get(link.sentence_idx))
            {
                *slot = json!({
                    "start": link.span.start,
                    "end": link.span.end,
                    "text": link.span.text,
                    "sentence_id": sentence.id,
                });
            }
        }
        debug!(claims = claims.len(), linked = links.len(), "Claims linked to transcript");

        Ok(claims
            .into_iter()
            .zip(timestamps)
            .zip(spans)
            .map(|((claim, start_time_s), span)| {
                let mut metadata = Map::new();
                metadata.insert("original_text".to_string(), Value::String(claim.original_text));
                metadata.insert("span".to_string(), span);
                VideoClaims {
                    video_id,
                    claim: claim.claim,
                    start_time_s,
                    metadata,
                }
            })
            .collect())
    }
}
