use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::llm::{LlmClient, LlmRequest};
use crate::parsing::{ParsingError, ParsingResult, parse_model_json_output};

use super::error::{TopicDetectionError, TopicResult};
use super::keywords::KeywordMap;
use super::prompts::{FIX_JSON, TOPIC_PROMPT};

/// sentence -> topics. Every article sentence is present; unmatched ones map to `[]`.
pub type SentenceTopics = HashMap<String, Vec<String>>;

/// Renders strings the way a Python list literal prints, which is how the prompt presents
/// the article.
pub(crate) fn python_list_literal(items: &[String]) -> String {
    let rendered: Vec<String> = items
        .iter()
        .map(|item| {
            let quote = if item.contains('\'') && !item.contains('"') { '"' } else { '\'' };
            let mut out = String::with_capacity(item.len() + 2);
            out.push(quote);
            for c in item.chars() {
                match c {
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    c if c == quote => {
                        out.push('\\');
                        out.push(c);
                    }
                    c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
                    c => out.push(c),
                }
            }
            out.push(quote);
            out
        })
        .collect();
    format!("[{}]", rendered.join(", "))
}

/// Keyword-guided topic classifier for whole articles.
///
/// Topic names are replaced by `"1"`, `"2"`, ... in the prompt so the model cannot
/// mistake a topic name for one of its keywords; replies are mapped back to names.
pub struct TopicKeywordFilter {
    keywords: KeywordMap,
    prompt_outline: String,
    mapped_keywords: Vec<(String, Vec<String>)>,
    topic_name_map: HashMap<String, String>,
    client: Arc<dyn LlmClient>,
}

impl std::fmt::Debug for TopicKeywordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicKeywordFilter")
            .field("topics", &self.keywords.len())
            .finish_non_exhaustive()
    }
}

impl TopicKeywordFilter {
    pub fn new(keywords: KeywordMap, client: Arc<dyn LlmClient>) -> Self {
        let (mapped_keywords, topic_name_map) = Self::do_topic_name_mapping(&keywords);
        Self {
            keywords,
            prompt_outline: TOPIC_PROMPT.to_string(),
            mapped_keywords,
            topic_name_map,
            client,
        }
    }

    /// Replaces the prompt outline; it must contain `[KEYWORDS]` and `[TEXT]`.
    pub fn with_prompt_outline(mut self, outline: impl Into<String>) -> Self {
        self.prompt_outline = outline.into();
        self
    }

    fn do_topic_name_mapping(
        keywords: &KeywordMap,
    ) -> (Vec<(String, Vec<String>)>, HashMap<String, String>) {
        let mut mapped = Vec::with_capacity(keywords.len());
        let mut names = HashMap::with_capacity(keywords.len());
        for (idx, (topic, words)) in keywords.iter().enumerate() {
            let key = (idx + 1).to_string();
            mapped.push((key.clone(), words.clone()));
            names.insert(key, topic.clone());
        }
        (mapped, names)
    }

    pub fn keywords(&self) -> &KeywordMap {
        &self.keywords
    }

    /// Numbered topics in prompt order.
    pub fn mapped_keywords(&self) -> &[(String, Vec<String>)] {
        &self.mapped_keywords
    }

    /// Numbered key -> topic name.
    pub fn topic_name_map(&self) -> &HashMap<String, String> {
        &self.topic_name_map
    }

    pub fn make_keyword_prompt(&self, article: &[String]) -> String {
        let keyword_prompt: String = self
            .mapped_keywords
            .iter()
            .map(|(key, words)| {
                format!(
                    "Topic '{key}' is defined by the terms [{}] \n",
                    words.join(", ")
                )
            })
            .collect();
        self.prompt_outline
            .replace("[KEYWORDS]", &keyword_prompt)
            .replace("[TEXT]", &python_list_literal(article))
    }

    /// Strips backticks, a `json` tag and newlines, then parses with JSON repair.
    pub fn parse(response: &str) -> ParsingResult<Value> {
        let cleaned: String = response.chars().filter(|c| *c != '`' && *c != '\n').collect();
        let cleaned = cleaned.trim_start();
        let cleaned = cleaned.strip_prefix("json").unwrap_or(cleaned);
        parse_model_json_output(cleaned)
    }

    /// Inverts `{topic: [sentences]}` into `{sentence: [topics]}` over every article sentence.
    ///
    /// A reply that is not an object assigns no topics. Sentences the model invented are
    /// ignored.
    pub fn format_results(&self, result: &Value, article: &[String]) -> ParsingResult<SentenceTopics> {
        let mut formatted: SentenceTopics = article.iter().map(|s| (s.clone(), Vec::new())).collect();
        let Value::Object(by_topic) = result else {
            debug!("Topic reply is not an object; assigning no topics");
            return Ok(formatted);
        };

        for (topic, sentences) in by_topic {
            let Value::Array(sentences) = sentences else {
                return Err(ParsingError::UnexpectedStructure {
                    reason: format!("topic '{topic}' does not map to a list"),
                });
            };
            for sentence in sentences {
                let Value::String(sentence) = sentence else {
                    return Err(ParsingError::UnexpectedStructure {
                        reason: format!("topic '{topic}' lists a non-string entry"),
                    });
                };
                if let Some(topics) = formatted.get_mut(sentence)
                    && !topics.contains(topic)
                {
                    topics.push(topic.clone());
                }
            }
        }
        Ok(formatted)
    }

    /// Maps numbered topic keys back to names, dropping keys the filter never issued.
    pub fn do_result_unmapping(&self, result: SentenceTopics) -> SentenceTopics {
        result
            .into_iter()
            .map(|(sentence, topics)| {
                let names = topics
                    .into_iter()
                    .filter_map(|key| {
                        let name = self.topic_name_map.get(&key).cloned();
                        if name.is_none() {
                            warn!(topic = %key, "Model returned an unknown topic");
                        }
                        name
                    })
                    .collect();
                (sentence, names)
            })
            .collect()
    }

    async fn run_once(&self, article: &[String]) -> TopicResult<SentenceTopics> {
        let prompt = self.make_keyword_prompt(article);
        let response = self.client.run_prompt(LlmRequest::new(prompt)).await?;

        let formatted = match Self::parse(&response).and_then(|v| self.format_results(&v, article)) {
            Ok(formatted) => formatted,
            Err(err) => {
                info!(error = %err, "Parsing error, requesting fixed JSON");
                let fix = FIX_JSON.replace("{INPUT_TEXT}", &response);
                let fixed = self.client.run_prompt(LlmRequest::new(fix)).await?;
                self.format_results(&Self::parse(&fixed)?, article)?
            }
        };
        Ok(self.do_result_unmapping(formatted))
    }

    /// Assigns topics to every sentence of `article` with one call per attempt.
    #[instrument(skip(self, article), fields(num_sentences = article.len()))]
    pub async fn run_all_for_article(
        &self,
        article: &[String],
        max_attempts: usize,
    ) -> TopicResult<SentenceTopics> {
        let max_attempts = max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.run_once(article).await {
                Ok(topics) => return Ok(topics),
                Err(err) => info!(attempt, error = %err, "Error raised while running topic detection"),
            }
        }
        Err(TopicDetectionError::AttemptsExhausted {
            attempts: max_attempts,
        })
    }
}
