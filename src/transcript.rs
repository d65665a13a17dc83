//! Transcript and claim records shared by the extraction and scoring pipelines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One sentence of a video transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSentence {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub video_id: Uuid,
    /// Where the text came from: speech-to-text, OCR, ...
    pub source: String,
    pub text: String,
    pub start_time_s: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl TranscriptSentence {
    pub fn new(
        video_id: Uuid,
        source: impl Into<String>,
        text: impl Into<String>,
        start_time_s: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            video_id,
            source: source.into(),
            text: text.into(),
            start_time_s,
            metadata: Map::new(),
        }
    }
}

/// A claim found in a video, with where it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoClaims {
    pub video_id: Uuid,
    pub claim: String,
    pub start_time_s: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}
