//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::countries::CountryError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A count could not be parsed as a positive integer.
    #[error("failed to parse {name} '{value}': {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A count was zero where at least one is needed.
    #[error("{name} must be at least 1, got '{value}'")]
    ZeroValue { name: &'static str, value: String },

    /// Link threshold is not a number in 0-100.
    #[error("invalid link threshold '{value}': must be a number between 0 and 100")]
    InvalidThreshold { value: String },

    /// A country code does not name an ISO 3166-1 country.
    #[error("invalid PASTEL_COUNTRY_CODES: {0}")]
    Country(#[from] CountryError),

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
