//! End-to-end pipeline tests: keyword file to scored claims, against a scripted LLM.

mod common;

use std::sync::Arc;

use common::fixtures::{
    CLAIMS_NEEDLE, TOPIC_NEEDLE, TranscriptBuilder, answers_reply, detector, fenced, strings,
    trained_model, trained_model_json, write_temp,
};
use pastel::claims::ClaimExtractor;
use pastel::countries::CountryError;
use pastel::llm::{MockLlmClient, RetryPolicy, ServiceErrorKind};
use pastel::pastel::DetectorConfig;
use pastel::pipeline::{
    CheckworthyError, CheckworthyResult, detector_for_country_codes, get_transcript_claims,
    run_checkworthy, search_transcript,
};
use pastel::topics::{AllKeywords, TopicKeywordFilter, format_keywords, validate_keywords};
use serde_json::json;
use uuid::Uuid;

const KEYWORDS: &str = r#"{
    "include_lists": {
        "fullfact": {
            "crime": {"en": ["Knife crime", "Police numbers"]},
            "health": {"en": ["NHS", "Waiting lists"], "cy": ["GIG"]}
        }
    }
}"#;

const POLICE: &str = "There are 20,000 more police officers than in 2019.";
const NHS: &str = "NHS waiting lists are at a record high.";
const CHAT: &str = "Thanks for having me on the show.";

fn topic_filter(mock: Arc<MockLlmClient>) -> TopicKeywordFilter {
    let file = write_temp(KEYWORDS, ".json");
    let all = AllKeywords::load(file.path()).unwrap();
    validate_keywords(&all, "fullfact", "en").unwrap();
    TopicKeywordFilter::new(format_keywords(&all, "fullfact", "en"), mock)
}

/// crime is topic "1" and health topic "2" once sorted.
fn newsroom_mock() -> MockLlmClient {
    MockLlmClient::new()
        .with_reply(
            TOPIC_NEEDLE,
            format!("```json\n{}\n```", json!({"1": [POLICE], "2": [NHS, POLICE]})),
        )
        .with_reply(fenced(POLICE), answers_reply("Yes", "Yes"))
        .with_reply(fenced(NHS), answers_reply("Yes", "No"))
}

#[tokio::test]
async fn test_run_checkworthy_end_to_end() {
    let mock = Arc::new(newsroom_mock());
    let filter = topic_filter(mock.clone());
    let detector = detector(mock.clone(), trained_model());

    let results = run_checkworthy(&filter, &detector, &strings(&[CHAT, POLICE, NHS]))
        .await
        .unwrap();

    assert_eq!(results[0], CheckworthyResult::default());
    assert_eq!(results[1].score, 3.0);
    assert_eq!(results[1].topics, vec!["crime".to_string(), "health".to_string()]);
    assert_eq!(results[2].score, 1.0);
    assert_eq!(results[2].topics, vec!["health".to_string()]);

    let topic_prompt = mock
        .prompts()
        .into_iter()
        .find(|p| p.contains(TOPIC_NEEDLE))
        .unwrap();
    assert!(topic_prompt.contains("Topic '1' is defined by the terms [Knife crime, Police numbers]"));
    assert!(!topic_prompt.contains("GIG"));
}

#[tokio::test]
async fn test_transcript_claims_carry_metadata() {
    let video_id = Uuid::new_v4();
    let mock = Arc::new(newsroom_mock());
    let filter = topic_filter(mock.clone());
    let detector = detector(mock, trained_model());
    let transcript = TranscriptBuilder::new()
        .video_id(video_id)
        .sentence(CHAT, 0.0)
        .sentence(POLICE, 3.0)
        .sentence(NHS, 9.5)
        .build();

    let claims = get_transcript_claims(&filter, &detector, &transcript)
        .await
        .unwrap();

    assert_eq!(claims.len(), 2);
    assert_eq!(claims[0].claim, POLICE);
    assert_eq!(claims[0].start_time_s, 3.0);
    assert_eq!(claims[0].video_id, video_id);
    assert_eq!(claims[0].metadata["topics"], json!(["crime", "health"]));
    assert_eq!(claims[1].metadata["score"], json!(1.0));
}

#[tokio::test]
async fn test_search_transcript_end_to_end() {
    let reply = json!([
        {"claim": "Police numbers are up by 20,000 since 2019.", "original_text": POLICE},
    ]);
    let mock = Arc::new(
        MockLlmClient::new()
            .with_reply(CLAIMS_NEEDLE, reply.to_string())
            .with_reply(
                fenced("Police numbers are up by 20,000 since 2019."),
                answers_reply("Yes", "Unsure"),
            ),
    );
    let extractor = ClaimExtractor::new(mock.clone());
    let detector = detector(mock, trained_model());
    let transcript = TranscriptBuilder::new()
        .sentence(CHAT, 0.0)
        .sentence(POLICE, 3.0)
        .build();

    let claims = search_transcript(&extractor, &detector, &transcript)
        .await
        .unwrap();

    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].start_time_s, 3.0);
    assert_eq!(claims[0].metadata["original_text"], json!(POLICE));
    // 2*yes + 1*unsure + has_number - 1
    assert_eq!(claims[0].metadata["score"], json!(2.5));
}

#[tokio::test]
async fn test_scoring_outage_surfaces_as_checkworthy_error() {
    let mock = Arc::new(
        MockLlmClient::new()
            .with_reply(TOPIC_NEEDLE, json!({"1": [POLICE]}).to_string())
            .with_failure("```", ServiceErrorKind::Unauthenticated),
    );
    let filter = topic_filter(mock.clone());
    let detector = detector(mock, trained_model());

    let err = run_checkworthy(&filter, &detector, &strings(&[POLICE]))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckworthyError::Pastel(_)));
    assert!(err.to_string().contains("Pastel failed 2 times"));
}

#[tokio::test]
async fn test_country_codes_drive_the_country_question() {
    let model_file = write_temp(&trained_model_json(), ".json");
    let mock = Arc::new(
        MockLlmClient::new()
            .with_reply(TOPIC_NEEDLE, json!({"1": [POLICE]}).to_string())
            .with_reply(fenced(POLICE), "0. Yes\n1. Yes\n2. Yes"),
    );
    let filter = topic_filter(mock.clone());
    let config = DetectorConfig::new(model_file.path()).with_retry_policy(RetryPolicy::immediate(1));
    let detector = detector_for_country_codes(config, &["gbr", "USA"], mock.clone()).unwrap();

    let results = run_checkworthy(&filter, &detector, &strings(&[POLICE]))
        .await
        .unwrap();
    // 2*claim + 1*harm + has_number - 1, then -1 for the foreign country
    assert_eq!(results[0].score, 2.0);

    let prompt = mock
        .prompts()
        .into_iter()
        .find(|p| p.contains("Question 2 Identify any country"))
        .unwrap();
    assert!(prompt.contains(&fenced(POLICE)));
    assert!(prompt.contains(
        "[United Kingdom, United States, England, Wales, Scotland, Northern Ireland, Britain, UK, America, USA]"
    ));
}

#[test]
fn test_unknown_country_code_is_rejected() {
    let mock = Arc::new(MockLlmClient::new());
    let config = DetectorConfig::new("no-such-model.json");

    let err = detector_for_country_codes(config, &["GBR", "XXX"], mock.clone()).unwrap_err();

    assert!(matches!(
        err,
        CheckworthyError::Country(CountryError::UnknownCode { ref code }) if code == "XXX"
    ));
    assert!(err.to_string().contains("country lookup failed"));
    assert_eq!(mock.call_count(), 0);
}
