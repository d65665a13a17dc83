use std::time::Duration;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponseFormat, JsonSpec};
use serde_json::Value;
use tracing::{debug, error};

use crate::constants::{
    DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_LLM_MODEL, DEFAULT_MAX_OUTPUT_TOKENS,
    DEFAULT_SYSTEM_INSTRUCTION,
};

use super::error::{LlmError, LlmResult, ServiceErrorKind};

#[derive(Debug, Clone, PartialEq)]
/// One text-completion request.
pub struct LlmRequest {
    /// User prompt.
    pub prompt: String,
    /// System instruction; `None` means [`DEFAULT_SYSTEM_INSTRUCTION`].
    pub system_instruction: Option<String>,
    /// JSON schema constraining the reply, if structured output is wanted.
    pub output_schema: Option<Value>,
}

impl LlmRequest {
    /// Creates a plain-text request with the default system instruction.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            output_schema: None,
        }
    }

    /// Overrides the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Requests JSON output matching `schema`.
    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Returns the effective system instruction.
    pub fn system_instruction(&self) -> &str {
        self.system_instruction
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_INSTRUCTION)
    }
}

impl From<&str> for LlmRequest {
    fn from(prompt: &str) -> Self {
        Self::new(prompt)
    }
}

#[async_trait]
/// Asynchronous text-completion service: prompt in, text out.
///
/// Replies are raw text and may be malformed; callers validate structure themselves.
pub trait LlmClient: Send + Sync {
    /// Runs a single prompt.
    async fn run_prompt(&self, request: LlmRequest) -> LlmResult<String>;
}

/// [`LlmClient`] backed by the `genai` multi-provider client.
#[derive(Clone)]
pub struct GenaiClient {
    client: Client,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenaiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiClient")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for GenaiClient {
    fn default() -> Self {
        Self::new(DEFAULT_LLM_MODEL)
    }
}

impl GenaiClient {
    /// Creates a client for `model` with the default per-call timeout.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
        }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_options(request: &LlmRequest) -> ChatOptions {
        let mut options = ChatOptions::default()
            .with_temperature(0.0)
            .with_max_tokens(DEFAULT_MAX_OUTPUT_TOKENS);

        if let Some(schema) = &request.output_schema {
            options = options.with_response_format(ChatResponseFormat::JsonSpec(JsonSpec::new(
                "response",
                schema.clone(),
            )));
        }

        options
    }
}

#[async_trait]
impl LlmClient for GenaiClient {
    async fn run_prompt(&self, request: LlmRequest) -> LlmResult<String> {
        let chat_req = ChatRequest::new(vec![ChatMessage::user(request.prompt.clone())])
            .with_system(request.system_instruction().to_string());
        let options = Self::build_options(&request);

        debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            structured = request.output_schema.is_some(),
            "Sending prompt"
        );

        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, chat_req, Some(&options)),
        )
        .await
        .map_err(|_| {
            LlmError::new(
                ServiceErrorKind::DeadlineExceeded,
                format!("no reply within {:?}", self.timeout),
            )
        })?
        .map_err(|e| {
            let message = e.to_string();
            let kind = ServiceErrorKind::classify(&message);
            error!(kind = %kind, "Provider error: {}", message);
            LlmError::new(kind, message)
        })?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::new(
                ServiceErrorKind::NoOutput,
                "provider returned no text",
            )),
        }
    }
}
