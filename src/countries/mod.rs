//! ISO 3166-1 alpha-3 codes to the country names used in the country question.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{CountryError, CountryResult};

use isocountry::CountryCode;

/// Short names for countries whose ISO name is not the one sentences use.
const COMMON_NAMES: &[(&str, &str)] = &[("GBR", "United Kingdom"), ("USA", "United States")];

fn common_name(code: CountryCode) -> &'static str {
    COMMON_NAMES
        .iter()
        .find(|(alpha3, _)| *alpha3 == code.alpha3())
        .map_or_else(|| code.name(), |(_, name)| *name)
}

/// Resolves one alpha-3 code, ignoring case and surrounding whitespace.
pub fn country_name(code: &str) -> CountryResult<&'static str> {
    let normalized = code.trim().to_ascii_uppercase();
    CountryCode::for_alpha3(&normalized)
        .map(common_name)
        .map_err(|_| CountryError::UnknownCode {
            code: code.to_string(),
        })
}

/// Resolves every code in order. Fails on the first unknown code.
pub fn country_names_from_codes<S: AsRef<str>>(codes: &[S]) -> CountryResult<Vec<String>> {
    codes
        .iter()
        .map(|code| country_name(code.as_ref()).map(str::to_string))
        .collect()
}
