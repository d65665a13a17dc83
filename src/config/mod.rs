//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `PASTEL_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_CALL_ATTEMPTS, DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_LINK_THRESHOLD, DEFAULT_LLM_MODEL,
    DEFAULT_MAX_ATTEMPTS,
};
use crate::countries::country_names_from_codes;
use crate::llm::{GenaiClient, RetryPolicy};
use crate::pastel::DetectorConfig;

/// Scoring configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PASTEL_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Trained checkworthy model file. Required for scoring.
    pub model_path: Option<PathBuf>,

    /// LLM used for every prompt. Default: `gemini-2.0-flash`.
    pub llm_model: String,

    /// Whole-batch attempts. Default: `3`.
    pub max_attempts: usize,

    /// Attempts per LLM call. Default: `3`.
    pub call_attempts: usize,

    /// Deadline for one LLM call, in seconds. Default: `120`.
    pub call_timeout_secs: u64,

    /// Quote-linking similarity threshold (0-100). Default: `80`.
    pub link_threshold: f64,

    /// Countries whose sentences are not scored down. Unset disables the country question.
    pub countries: Option<Vec<String>>,

    /// ISO alpha-3 codes resolved to names and added to `countries`.
    pub country_codes: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: None,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            call_attempts: DEFAULT_CALL_ATTEMPTS,
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
            link_threshold: DEFAULT_LINK_THRESHOLD,
            countries: None,
            country_codes: None,
        }
    }
}

impl Config {
    const ENV_MODEL_PATH: &'static str = "PASTEL_MODEL_PATH";
    const ENV_LLM_MODEL: &'static str = "PASTEL_LLM_MODEL";
    const ENV_MAX_ATTEMPTS: &'static str = "PASTEL_MAX_ATTEMPTS";
    const ENV_CALL_ATTEMPTS: &'static str = "PASTEL_CALL_ATTEMPTS";
    const ENV_CALL_TIMEOUT_SECS: &'static str = "PASTEL_CALL_TIMEOUT_SECS";
    const ENV_LINK_THRESHOLD: &'static str = "PASTEL_LINK_THRESHOLD";
    const ENV_COUNTRIES: &'static str = "PASTEL_COUNTRIES";
    const ENV_COUNTRY_CODES: &'static str = "PASTEL_COUNTRY_CODES";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let llm_model = Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model);
        let max_attempts = Self::parse_count_from_env(Self::ENV_MAX_ATTEMPTS, defaults.max_attempts)?;
        let call_attempts =
            Self::parse_count_from_env(Self::ENV_CALL_ATTEMPTS, defaults.call_attempts)?;
        let call_timeout_secs =
            Self::parse_count_from_env(Self::ENV_CALL_TIMEOUT_SECS, defaults.call_timeout_secs)?;
        let link_threshold = Self::parse_threshold_from_env(defaults.link_threshold)?;
        let countries = Self::parse_list_from_env(Self::ENV_COUNTRIES);
        let country_codes = Self::parse_list_from_env(Self::ENV_COUNTRY_CODES);
        if let Some(ref codes) = country_codes {
            country_names_from_codes(codes)?;
        }

        Ok(Self {
            model_path,
            llm_model,
            max_attempts,
            call_attempts,
            call_timeout_secs,
            link_threshold,
            countries,
            country_codes,
        })
    }

    /// Validates the model path if one is set (does not require it) and the country codes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.country_names()?;
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Returns the model path, or an error naming the variable that should set it.
    pub fn require_model_path(&self) -> Result<&Path, ConfigError> {
        self.model_path
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_MODEL_PATH,
            })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.call_attempts)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Production LLM client for the configured model and deadline.
    pub fn llm_client(&self) -> GenaiClient {
        GenaiClient::new(self.llm_model.clone()).with_timeout(self.call_timeout())
    }

    /// Detector settings; fails if no model path is configured.
    pub fn detector_config(&self) -> Result<DetectorConfig, ConfigError> {
        let mut detector = DetectorConfig::new(self.require_model_path()?)
            .with_retry_policy(self.retry_policy())
            .with_max_attempts(self.max_attempts);
        if let Some(countries) = self.country_names()? {
            detector = detector.with_countries(countries);
        }
        Ok(detector)
    }

    /// `countries` followed by the names of `country_codes`, without repeats.
    pub fn country_names(&self) -> Result<Option<Vec<String>>, ConfigError> {
        let mut names = self.countries.clone().unwrap_or_default();
        if let Some(ref codes) = self.country_codes {
            for name in country_names_from_codes(codes)? {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok((!names.is_empty()).then_some(names))
    }

    fn parse_count_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr<Err = std::num::ParseIntError> + PartialEq + From<u8>,
    {
        match env::var(var_name) {
            Ok(value) => {
                let count: T = value.trim().parse().map_err(|e| ConfigError::IntParseError {
                    name: var_name,
                    value: value.clone(),
                    source: e,
                })?;

                if count == T::from(0) {
                    return Err(ConfigError::ZeroValue {
                        name: var_name,
                        value,
                    });
                }

                Ok(count)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f64) -> Result<f64, ConfigError> {
        match env::var(Self::ENV_LINK_THRESHOLD) {
            Ok(value) => match value.trim().parse::<f64>() {
                Ok(threshold) if (0.0..=100.0).contains(&threshold) => Ok(threshold),
                _ => Err(ConfigError::InvalidThreshold { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }

    fn parse_list_from_env(var_name: &str) -> Option<Vec<String>> {
        let items: Vec<String> = env::var(var_name)
            .ok()?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        (!items.is_empty()).then_some(items)
    }
}
