use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CountryError {
    #[error("unknown ISO 3166-1 alpha-3 country code: '{code}'")]
    UnknownCode { code: String },
}

pub type CountryResult<T> = Result<T, CountryError>;
