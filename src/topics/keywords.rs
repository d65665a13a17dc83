use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{TopicDetectionError, TopicResult};

/// topic -> keywords for one organisation and language.
pub type KeywordMap = BTreeMap<String, Vec<String>>;

/// org -> topic -> language -> keywords.
pub type OrgKeywords = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<String>>>>;

/// Every organisation's keyword lists, as stored in the keyword file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllKeywords {
    pub include_lists: OrgKeywords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_lists: Option<OrgKeywords>,
}

impl AllKeywords {
    pub fn from_json_str(raw: &str) -> TopicResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> TopicResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}

fn invalid(reason: impl Into<String>) -> TopicDetectionError {
    TopicDetectionError::InvalidKeywords {
        reason: reason.into(),
    }
}

/// Checks that `all` is usable for `org`.
///
/// Every list must name the organisation. Include lists must have at least one topic and
/// no empty word list in any language.
pub fn validate_keywords(all: &AllKeywords, org: &str, lang: &str) -> TopicResult<()> {
    let include = all
        .include_lists
        .get(org)
        .ok_or_else(|| invalid(format!("organisation '{org}' has no include list")))?;
    if include.is_empty() {
        return Err(invalid(format!("no topics for organisation '{org}'")));
    }
    for (topic, by_lang) in include {
        for (word_lang, words) in by_lang {
            if words.is_empty() {
                return Err(invalid(format!(
                    "word list for topic '{topic}' in '{word_lang}' for '{org}' is empty"
                )));
            }
        }
    }
    if let Some(exclude) = &all.exclude_lists
        && !exclude.contains_key(org)
    {
        return Err(invalid(format!("organisation '{org}' has no exclude list")));
    }
    if !include.values().any(|by_lang| by_lang.contains_key(lang)) {
        warn!(org, lang, "No include keywords in this language");
    }
    Ok(())
}

/// Flattens the include lists of `org` to topic -> keywords in `lang`.
///
/// Topics without keywords in `lang` are dropped; exclude lists are not used.
pub fn format_keywords(all: &AllKeywords, org: &str, lang: &str) -> KeywordMap {
    all.include_lists
        .get(org)
        .into_iter()
        .flatten()
        .filter_map(|(topic, by_lang)| {
            by_lang
                .get(lang)
                .filter(|words| !words.is_empty())
                .map(|words| (topic.clone(), words.clone()))
        })
        .collect()
}
