use super::*;
use crate::countries::CountryError;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_pastel_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("PASTEL_MODEL_PATH");
        env::remove_var("PASTEL_LLM_MODEL");
        env::remove_var("PASTEL_MAX_ATTEMPTS");
        env::remove_var("PASTEL_CALL_ATTEMPTS");
        env::remove_var("PASTEL_CALL_TIMEOUT_SECS");
        env::remove_var("PASTEL_LINK_THRESHOLD");
        env::remove_var("PASTEL_COUNTRIES");
        env::remove_var("PASTEL_COUNTRY_CODES");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.model_path.is_none());
    assert_eq!(config.llm_model, "gemini-2.0-flash");
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.call_attempts, 3);
    assert_eq!(config.call_timeout_secs, 120);
    assert_eq!(config.link_threshold, 80.0);
    assert!(config.countries.is_none());
    assert!(config.country_codes.is_none());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_pastel_env();

    let config = Config::from_env().expect("should parse with defaults");
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_pastel_env();

    with_env_vars(
        &[
            ("PASTEL_MODEL_PATH", "/models/checkworthy.json"),
            ("PASTEL_LLM_MODEL", "gemini-2.5-pro"),
            ("PASTEL_MAX_ATTEMPTS", "5"),
            ("PASTEL_CALL_ATTEMPTS", "2"),
            ("PASTEL_CALL_TIMEOUT_SECS", "30"),
            ("PASTEL_LINK_THRESHOLD", "72.5"),
            ("PASTEL_COUNTRIES", "United Kingdom, Ireland"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(
                config.model_path,
                Some(PathBuf::from("/models/checkworthy.json"))
            );
            assert_eq!(config.llm_model, "gemini-2.5-pro");
            assert_eq!(config.max_attempts, 5);
            assert_eq!(config.call_attempts, 2);
            assert_eq!(config.call_timeout(), Duration::from_secs(30));
            assert_eq!(config.link_threshold, 72.5);
            assert_eq!(
                config.countries,
                Some(vec!["United Kingdom".to_string(), "Ireland".to_string()])
            );
        },
    );
}

#[test]
#[serial]
fn test_blank_values_fall_back() {
    clear_pastel_env();

    with_env_vars(
        &[
            ("PASTEL_MODEL_PATH", "  "),
            ("PASTEL_LLM_MODEL", ""),
            ("PASTEL_COUNTRIES", " , ,"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert!(config.model_path.is_none());
            assert_eq!(config.llm_model, "gemini-2.0-flash");
            assert!(config.countries.is_none());
        },
    );
}

#[test]
#[serial]
fn test_invalid_attempts_not_number() {
    clear_pastel_env();

    with_env_vars(&[("PASTEL_MAX_ATTEMPTS", "lots")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::IntParseError {
                name: "PASTEL_MAX_ATTEMPTS",
                ..
            }
        ));
        assert!(err.to_string().contains("failed to parse PASTEL_MAX_ATTEMPTS"));
    });
}

#[test]
#[serial]
fn test_invalid_attempts_zero() {
    clear_pastel_env();

    with_env_vars(&[("PASTEL_CALL_ATTEMPTS", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroValue { .. }));
        assert!(err.to_string().contains("at least 1"));
    });
}

#[test]
#[serial]
fn test_invalid_timeout_negative() {
    clear_pastel_env();

    with_env_vars(&[("PASTEL_CALL_TIMEOUT_SECS", "-5")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::IntParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_threshold() {
    clear_pastel_env();

    for bad in ["120", "-1", "high"] {
        with_env_vars(&[("PASTEL_LINK_THRESHOLD", bad)], || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidThreshold { .. }), "{bad}");
        });
    }
}

#[test]
fn test_validate_nonexistent_model_path() {
    let config = Config {
        model_path: Some(PathBuf::from("/nonexistent/path/to/model.json")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_model_path_is_directory() {
    let config = Config {
        model_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotAFile { .. }));
}

#[test]
fn test_validate_success() {
    let config = Config {
        model_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_detector_config_requires_model_path() {
    let err = Config::default().detector_config().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingEnvVar {
            name: "PASTEL_MODEL_PATH"
        }
    ));
}

#[test]
fn test_detector_config_carries_settings() {
    let config = Config {
        model_path: Some(PathBuf::from("model.json")),
        max_attempts: 4,
        call_attempts: 2,
        countries: Some(vec!["United States".to_string()]),
        ..Default::default()
    };

    let detector = config.detector_config().unwrap();
    assert_eq!(detector.model_path, PathBuf::from("model.json"));
    assert_eq!(detector.max_attempts, 4);
    assert_eq!(detector.retry.max_attempts, 2);
    assert_eq!(detector.countries, Some(vec!["United States".to_string()]));
}

#[test]
#[serial]
fn test_from_env_resolves_country_codes() {
    clear_pastel_env();

    with_env_vars(
        &[
            ("PASTEL_COUNTRIES", "Ireland"),
            ("PASTEL_COUNTRY_CODES", "GBR, usa"),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(
                config.country_codes,
                Some(vec!["GBR".to_string(), "usa".to_string()])
            );
            assert_eq!(
                config.country_names().unwrap(),
                Some(vec![
                    "Ireland".to_string(),
                    "United Kingdom".to_string(),
                    "United States".to_string(),
                ])
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_rejects_unknown_country_code() {
    clear_pastel_env();

    with_env_vars(&[("PASTEL_COUNTRY_CODES", "GBR,ZZZ")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Country(CountryError::UnknownCode { ref code }) if code == "ZZZ"
        ));
        assert!(err.to_string().contains("PASTEL_COUNTRY_CODES"));
    });
}

#[test]
fn test_detector_config_merges_names_and_codes() {
    let config = Config {
        model_path: Some(PathBuf::from("model.json")),
        countries: Some(vec!["United Kingdom".to_string()]),
        country_codes: Some(vec!["GBR".to_string(), "FRA".to_string()]),
        ..Default::default()
    };

    let detector = config.detector_config().unwrap();
    assert_eq!(
        detector.countries,
        Some(vec!["United Kingdom".to_string(), "France".to_string()])
    );
}

#[test]
fn test_validate_rejects_unknown_country_code() {
    let config = Config {
        country_codes: Some(vec!["ABC".to_string()]),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Country(_))));
}

#[test]
fn test_llm_client_uses_configured_model() {
    let config = Config {
        llm_model: "gemini-2.5-flash".to_string(),
        ..Default::default()
    };
    assert_eq!(config.llm_client().model(), "gemini-2.5-flash");
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidThreshold {
        value: "120".to_string(),
    };
    assert!(err.to_string().contains("120"));
    assert!(err.to_string().contains("between 0 and 100"));

    let err = ConfigError::PathNotFound {
        path: PathBuf::from("/some/path"),
    };
    assert!(err.to_string().contains("/some/path"));

    let err = ConfigError::MissingEnvVar {
        name: "PASTEL_MODEL_PATH",
    };
    assert!(err.to_string().contains("PASTEL_MODEL_PATH"));
}
