//! End-to-end checkworthiness runs over articles and transcripts.
//!
//! Topic filtering or claim extraction picks what is worth asking about, then the
//! checkworthy detector scores it. Stage failures surface as [`CheckworthyError`].

pub mod checkworthy;
pub mod error;
pub mod types;


pub use checkworthy::{
    detector_for_country_codes, get_transcript_claims, run_checkworthy, search_transcript,
};
pub use error::{CheckworthyError, PipelineResult};
pub use types::CheckworthyResult;
