//! Test fixtures for integration tests.

use std::io::Write;
use std::sync::Arc;

use pastel::llm::{MockLlmClient, RetryPolicy};
use pastel::pastel::{CheckworthyClaimDetector, FeatureModel, Pastel};
use pastel::transcript::TranscriptSentence;
use tempfile::NamedTempFile;
use uuid::Uuid;

pub const Q_CLAIM: &str = "Does the sentence contain a factual claim?";
pub const Q_HARM: &str = "Could the sentence cause harm if false?";

pub const TOPIC_NEEDLE: &str = "Look for the above topics";
pub const CLAIMS_NEEDLE: &str = "Find the main claims";

/// Needle matching the scoring prompt for exactly `sentence`.
pub fn fenced(sentence: &str) -> String {
    format!("```{sentence}```")
}

/// Two-question reply in the numbered format the scorer expects.
pub fn answers_reply(claim: &str, harm: &str) -> String {
    format!("0. {claim}\n1. {harm}")
}

pub fn write_temp(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Trained model: `2*claim + 1*harm + 1*has_number - 1`.
pub fn trained_model_json() -> String {
    serde_json::json!({
        Q_CLAIM: 2.0,
        Q_HARM: 1.0,
        "has_number": 1.0,
        "bias": -1.0,
    })
    .to_string()
}

pub fn trained_model() -> FeatureModel {
    FeatureModel::from_json_str(&trained_model_json()).expect("valid model")
}

pub fn detector(mock: Arc<MockLlmClient>, model: FeatureModel) -> CheckworthyClaimDetector {
    let pastel = Pastel::new(model, mock).with_retry_policy(RetryPolicy::immediate(2));
    CheckworthyClaimDetector::from_pastel(pastel, 2)
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Default)]
pub struct TranscriptBuilder {
    video_id: Option<Uuid>,
    sentences: Vec<(String, f64)>,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video_id(mut self, id: Uuid) -> Self {
        self.video_id = Some(id);
        self
    }

    pub fn sentence(mut self, text: &str, start_time_s: f64) -> Self {
        self.sentences.push((text.to_string(), start_time_s));
        self
    }

    pub fn build(self) -> Vec<TranscriptSentence> {
        let video_id = self.video_id.unwrap_or_else(Uuid::new_v4);
        self.sentences
            .into_iter()
            .map(|(text, start)| TranscriptSentence::new(video_id, "speech", text, start))
            .collect()
    }
}
