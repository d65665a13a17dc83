//! Claim extraction from transcripts.
//!
//! One schema-constrained call per attempt asks for the main claims and the sentence each
//! came from. The quoted sentence is fuzzy-linked back to the transcript to recover when
//! the claim was made.

pub mod error;
pub mod extractor;
pub mod prompts;
pub mod timestamps;
pub mod types;


pub use error::{ClaimExtractionError, ClaimResult};
pub use extractor::ClaimExtractor;
pub use timestamps::{attach_timestamps, timestamps_from_links};
pub use types::TextClaim;
