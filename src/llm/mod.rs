//! LLM text-completion boundary.
//!
//! [`LlmClient`] is the only seam through which prompts leave the process. Failures are
//! tagged with a [`ServiceErrorKind`] so callers can decide on retries by kind alone.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod retry;


pub use client::{GenaiClient, LlmClient, LlmRequest};
pub use error::{LlmError, LlmResult, ServiceErrorKind};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockLlmClient;
pub use retry::RetryPolicy;
