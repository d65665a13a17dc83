//! Keyword-guided topic filtering.
//!
//! Each organisation defines topics by keyword lists. One LLM call per article returns the
//! sentences that make claims about each topic, which are inverted into per-sentence topic
//! lists. Sentences about no topic get an empty list and never reach the scorer.

pub mod error;
pub mod filter;
pub mod keywords;
pub mod prompts;


pub use error::{TopicDetectionError, TopicResult};
pub use filter::{SentenceTopics, TopicKeywordFilter};
pub use keywords::{AllKeywords, KeywordMap, format_keywords, validate_keywords};
