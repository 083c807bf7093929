use regex::Regex;

use crate::common::{FormInput, UtmError};

thread_local! {
    static BASE_URL_RE: Regex =
        Regex::new(r"^(https?://)([a-zA-Z0-9.-]+)(\.[a-zA-Z]{2,})(/.*)?$").unwrap();
}

/// Checks the raw base URL against `scheme://host.tld[/path]`. No trimming or
/// normalization happens here.
pub fn valid_url(url: &str) -> bool {
    BASE_URL_RE.with(|re| re.is_match(url))
}

/// Names of required fields that are empty, in form order.
pub fn missing_required(input: &FormInput) -> Vec<&'static str> {
    [
        ("base_url", &input.base_url),
        ("source", &input.source),
        ("medium", &input.medium),
        ("campaign", &input.campaign),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect()
}

/// Runs the required-field check, then the URL format check.
pub fn validate_input(input: &FormInput) -> Result<(), UtmError> {
    let missing = missing_required(input);
    if !missing.is_empty() {
        return Err(UtmError::MissingField(missing));
    }

    if !valid_url(&input.base_url) {
        return Err(UtmError::InvalidUrl(input.base_url.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_url_basic() {
        assert!(valid_url("https://example.com"));
        assert!(valid_url("http://example.com/"));
        assert!(valid_url("https://www.example.com.br/promo/outubro"));
        assert!(valid_url("https://sub-domain.example.io/path?x=1"));

        assert!(!valid_url(""));
        assert!(!valid_url("example.com"));
        assert!(!valid_url("ftp://example.com"));
        assert!(!valid_url("https://localhost"));
        assert!(!valid_url("https://example.c"));
        assert!(!valid_url("https://exa mple.com"));
    }

    #[test]
    fn test_valid_url_rejects_unlisted_host_chars() {
        assert!(!valid_url("https://example.com:8080/"));
        assert!(!valid_url("https://user@example.com"));
        assert!(!valid_url(" https://example.com"));
        assert!(!valid_url("https://example.com?utm_source=x"));
    }

    #[test]
    fn test_missing_required_in_form_order() {
        let input = FormInput {
            base_url: String::new(),
            source: "google".to_string(),
            medium: String::new(),
            campaign: "promo".to_string(),
            ..Default::default()
        };
        assert_eq!(missing_required(&input), vec!["base_url", "medium"]);
    }

    #[test]
    fn test_required_check_runs_before_url_check() {
        let input = FormInput {
            base_url: "not a url".to_string(),
            source: String::new(),
            medium: "cpc".to_string(),
            campaign: "promo".to_string(),
            ..Default::default()
        };
        match validate_input(&input) {
            Err(UtmError::MissingField(fields)) => assert_eq!(fields, vec!["source"]),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_url_reported() {
        let input = FormInput {
            base_url: "www.example.com".to_string(),
            source: "google".to_string(),
            medium: "cpc".to_string(),
            campaign: "promo".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            validate_input(&input),
            Err(UtmError::InvalidUrl(url)) if url == "www.example.com"
        ));
    }
}
