use thiserror::Error;

use crate::claims::ClaimExtractionError;
use crate::countries::CountryError;
use crate::pastel::PastelError;
use crate::topics::TopicDetectionError;

#[derive(Debug, Error)]
/// Failure of a checkworthiness pipeline, tagged with the stage that failed.
pub enum CheckworthyError {
    #[error("topic detection failed: {0}")]
    Topics(#[from] TopicDetectionError),

    #[error("checkworthiness scoring failed: {0}")]
    Pastel(#[from] PastelError),

    #[error("claim extraction failed: {0}")]
    Claims(#[from] ClaimExtractionError),

    #[error("country lookup failed: {0}")]
    Country(#[from] CountryError),
}

/// Convenience result type for the pipelines.
pub type PipelineResult<T> = Result<T, CheckworthyError>;
