use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::claims::ClaimExtractor;
use crate::constants::PIPELINE_MAX_ATTEMPTS;
use crate::llm::LlmClient;
use crate::pastel::{CheckworthyClaimDetector, DetectorConfig, ScoredSentence};
use crate::topics::{SentenceTopics, TopicKeywordFilter};
use crate::transcript::{TranscriptSentence, VideoClaims};

use super::error::PipelineResult;
use super::types::CheckworthyResult;

/// Sentences with at least one topic, first occurrence order, without repeats.
fn sentences_with_topics<'a>(sentences: &'a [String], topics: &SentenceTopics) -> Vec<&'a String> {
    let mut seen = HashSet::new();
    let mut have_topic = Vec::new();
    for sentence in sentences {
        if topics.get(sentence).is_some_and(|t| !t.is_empty()) && seen.insert(sentence.as_str()) {
            have_topic.push(sentence);
        }
    }
    have_topic
}

fn answers_value(scored: &ScoredSentence) -> Value {
    scored.answers.as_ref().map_or(Value::Null, |answers| json!(answers))
}

/// Builds a detector whose country question covers the given ISO alpha-3 codes.
///
/// Codes are resolved before the model is loaded, so an unknown code fails fast.
pub fn detector_for_country_codes<S: AsRef<str>>(
    config: DetectorConfig,
    country_codes: &[S],
    client: Arc<dyn LlmClient>,
) -> PipelineResult<CheckworthyClaimDetector> {
    let config = config.with_country_codes(country_codes)?;
    Ok(CheckworthyClaimDetector::new(config, client)?)
}

/// Topic-filters `sentences` and scores those with a topic.
///
/// Results line up with the input. Sentences without a topic get score 0 and are never
/// sent to the scorer.
#[instrument(skip_all, fields(num_sentences = sentences.len()))]
pub async fn run_checkworthy(
    filter: &TopicKeywordFilter,
    detector: &CheckworthyClaimDetector,
    sentences: &[String],
) -> PipelineResult<Vec<CheckworthyResult>> {
    let topics_start = Instant::now();
    let topics = filter
        .run_all_for_article(sentences, PIPELINE_MAX_ATTEMPTS)
        .await?;
    let topics_ms = topics_start.elapsed().as_millis() as u64;

    let have_topic = sentences_with_topics(sentences, &topics);
    debug!(with_topics = have_topic.len(), "Sentences have topics");

    let mut verdicts: HashMap<&str, CheckworthyResult> = HashMap::new();
    let pastel_start = Instant::now();
    if !have_topic.is_empty() {
        let batch: Vec<String> = have_topic.iter().map(|s| s.to_string()).collect();
        let scored = detector
            .score_sentences(&batch, PIPELINE_MAX_ATTEMPTS)
            .await?;
        for (sentence, scored) in have_topic.iter().zip(scored) {
            verdicts.insert(
                sentence.as_str(),
                CheckworthyResult {
                    score: scored.score,
                    topics: topics.get(*sentence).cloned().unwrap_or_default(),
                },
            );
        }
    }
    let pastel_ms = pastel_start.elapsed().as_millis() as u64;

    let nonzero = verdicts.values().filter(|v| v.score > 0.0).count();
    info!(
        topics_runtime_ms = topics_ms,
        pastel_runtime_ms = pastel_ms,
        checked = have_topic.len(),
        nonzero,
        "Checkworthy run complete"
    );

    Ok(sentences
        .iter()
        .map(|s| verdicts.get(s.as_str()).cloned().unwrap_or_default())
        .collect())
}

/// Finds checkworthy sentences in a transcript.
///
/// Sentences are topic-filtered, the rest scored, and only those scoring above zero are
/// kept. Each claim's metadata extends the sentence's with `score`, `topics` and `answers`.
#[instrument(skip_all, fields(num_sentences = transcript.len()))]
pub async fn get_transcript_claims(
    filter: &TopicKeywordFilter,
    detector: &CheckworthyClaimDetector,
    transcript: &[TranscriptSentence],
) -> PipelineResult<Vec<VideoClaims>> {
    let texts: Vec<String> = transcript.iter().map(|s| s.text.clone()).collect();

    let topics_start = Instant::now();
    let topics = filter
        .run_all_for_article(&texts, PIPELINE_MAX_ATTEMPTS)
        .await?;
    let topics_ms = topics_start.elapsed().as_millis() as u64;

    let have_topic: Vec<String> = sentences_with_topics(&texts, &topics)
        .into_iter()
        .cloned()
        .collect();
    debug!(with_topics = have_topic.len(), "Sentences have topics");
    if have_topic.is_empty() {
        info!(
            topics_runtime_ms = topics_ms,
            pastel_runtime_ms = 0u64,
            checked = 0usize,
            nonzero = 0usize,
            "Transcript run complete"
        );
        return Ok(Vec::new());
    }

    let pastel_start = Instant::now();
    let scored = detector
        .score_sentences(&have_topic, PIPELINE_MAX_ATTEMPTS)
        .await?;
    let by_text: HashMap<&str, &ScoredSentence> =
        scored.iter().map(|s| (s.sentence.as_str(), s)).collect();

    let claims: Vec<VideoClaims> = transcript
        .iter()
        .filter_map(|sentence| {
            let scored = by_text.get(sentence.text.as_str())?;
            if scored.score <= 0.0 {
                return None;
            }
            let mut metadata = sentence.metadata.clone();
            metadata.insert("score".to_string(), json!(scored.score));
            metadata.insert(
                "topics".to_string(),
                json!(topics.get(&sentence.text).cloned().unwrap_or_default()),
            );
            metadata.insert("answers".to_string(), answers_value(scored));
            Some(VideoClaims {
                video_id: sentence.video_id,
                claim: sentence.text.clone(),
                start_time_s: sentence.start_time_s,
                metadata,
            })
        })
        .collect();

    info!(
        topics_runtime_ms = topics_ms,
        pastel_runtime_ms = pastel_start.elapsed().as_millis() as u64,
        checked = have_topic.len(),
        nonzero = claims.len(),
        "Transcript run complete"
    );
    Ok(claims)
}

/// Extracts claims from a transcript and scores each one.
///
/// Claims need not be whole sentences. Every extracted claim is returned with `score` and
/// `answers` added to its metadata.
#[instrument(skip_all, fields(num_sentences = transcript.len()))]
pub async fn search_transcript(
    extractor: &ClaimExtractor,
    detector: &CheckworthyClaimDetector,
    transcript: &[TranscriptSentence],
) -> PipelineResult<Vec<VideoClaims>> {
    let mut claims = extractor
        .extract_claims_from_transcript(transcript, PIPELINE_MAX_ATTEMPTS)
        .await?;
    if claims.is_empty() {
        return Ok(claims);
    }

    let texts: Vec<String> = claims.iter().map(|c| c.claim.clone()).collect();
    let scored = detector
        .score_sentences(&texts, PIPELINE_MAX_ATTEMPTS)
        .await?;
    for (claim, scored) in claims.iter_mut().zip(&scored) {
        claim.metadata.insert("score".to_string(), json!(scored.score));
        claim.metadata.insert("answers".to_string(), answers_value(scored));
    }
    info!(claims = claims.len(), "Transcript search complete");
    Ok(claims)
}
