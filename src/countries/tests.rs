use super::*;

#[test]
fn test_uk_and_us_use_common_names() {
    let names = country_names_from_codes(&["GBR", "USA"]).unwrap();
    assert_eq!(names, vec!["United Kingdom", "United States"]);
}

#[test]
fn test_codes_are_case_and_whitespace_insensitive() {
    assert_eq!(country_name(" gbr ").unwrap(), "United Kingdom");
    assert_eq!(country_name("fra").unwrap(), "France");
}

#[test]
fn test_unknown_code_is_rejected() {
    let err = country_names_from_codes(&["GBR", "XYZ"]).unwrap_err();
    assert_eq!(
        err,
        CountryError::UnknownCode {
            code: "XYZ".to_string()
        }
    );
    assert!(err.to_string().contains("'XYZ'"));
}

#[test]
fn test_alpha2_code_is_not_accepted() {
    assert!(country_name("GB").is_err());
}

#[test]
fn test_empty_list_resolves_to_no_names() {
    let none: [&str; 0] = [];
    assert!(country_names_from_codes(&none).unwrap().is_empty());
}
