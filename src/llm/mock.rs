use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::client::{LlmClient, LlmRequest};
use super::error::{LlmError, LlmResult, ServiceErrorKind};

type Scripted = Result<String, ServiceErrorKind>;

struct Rule {
    needle: String,
    replies: VecDeque<Scripted>,
}

/// Scripted [`LlmClient`] for tests.
///
/// Rules match on a prompt substring and are checked in insertion order. A rule
/// with several replies yields them in sequence and keeps repeating the last one.
#[derive(Default)]
pub struct MockLlmClient {
    rules: Mutex<Vec<Rule>>,
    default_reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl std::fmt::Debug for MockLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLlmClient")
            .field("calls", &self.call_count())
            .finish_non_exhaustive()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used when no rule matches. Without one, unmatched prompts fail with `NoOutput`.
    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = Some(reply.into());
        self
    }

    /// Always answers prompts containing `needle` with `reply`.
    pub fn with_reply(self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.with_sequence(needle, vec![Ok(reply.into())])
    }

    /// Always fails prompts containing `needle` with `kind`.
    pub fn with_failure(self, needle: impl Into<String>, kind: ServiceErrorKind) -> Self {
        self.with_sequence(needle, vec![Err(kind)])
    }

    /// Answers prompts containing `needle` with `replies` in order.
    pub fn with_sequence(self, needle: impl Into<String>, replies: Vec<Scripted>) -> Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push(Rule {
                needle: needle.into(),
                replies: replies.into(),
            });
        }
        self
    }

    /// Number of prompts received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of prompts received that contained `needle`.
    pub fn calls_containing(&self, needle: &str) -> usize {
        self.prompts
            .lock()
            .map(|p| p.iter().filter(|prompt| prompt.contains(needle)).count())
            .unwrap_or(0)
    }

    /// Every prompt received, in arrival order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn run_prompt(&self, request: LlmRequest) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        let scripted = {
            let mut rules = self
                .rules
                .lock()
                .map_err(|_| LlmError::new(ServiceErrorKind::Other, "mock lock poisoned"))?;
            rules
                .iter_mut()
                .find(|rule| request.prompt.contains(&rule.needle))
                .and_then(|rule| {
                    if rule.replies.len() > 1 {
                        rule.replies.pop_front()
                    } else {
                        rule.replies.front().cloned()
                    }
                })
        };

        match scripted {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(kind)) => Err(LlmError::new(kind, "scripted failure")),
            None => self.default_reply.clone().ok_or_else(|| {
                LlmError::new(ServiceErrorKind::NoOutput, "no scripted reply for prompt")
            }),
        }
    }
}
