//! Best-effort recovery of structured data from LLM replies.

pub mod error;
pub mod repair;


pub use error::{ParsingError, ParsingResult};
pub use repair::{parse_model_json_output, repair_json, strip_code_fences};
