//! API key extraction from the BNZ rates page.
//!
//! The rates feed requires an `apikey` header. BNZ embeds the key in the
//! bootstrap script of its public comparison page, e.g.
//! `window.__bootstrap = { apiKey: 'abc123', ... }`.

use kiwi_traits::TraitError;
use once_cell::sync::Lazy;
use regex::Regex;

static API_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"apiKey\s*:\s*["']([^"']+)["']"#).expect("valid regex"));

/// Extracts the feed API key from the comparison page HTML.
///
/// # Errors
///
/// Returns [`TraitError::NotFound`] if the page has no `apiKey` entry.
pub fn extract_api_key(html: &str) -> Result<String, TraitError> {
    API_KEY_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TraitError::NotFound("API key not found in HTML".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quotes() {
        let html = "<script>window.__bootstrap = { apiKey: 'abc123XYZ', env: 'prod' };</script>";
        assert_eq!(extract_api_key(html).unwrap(), "abc123XYZ");
    }

    #[test]
    fn test_double_quotes_no_space() {
        let html = r#"<script>window.__bootstrap={apiKey:"k-9_8"}</script>"#;
        assert_eq!(extract_api_key(html).unwrap(), "k-9_8");
    }

    #[test]
    fn test_whitespace_around_colon() {
        let html = "apiKey \n :\t 'spaced'";
        assert_eq!(extract_api_key(html).unwrap(), "spaced");
    }

    #[test]
    fn test_first_match_wins() {
        let html = "apiKey: 'first' ... apiKey: 'second'";
        assert_eq!(extract_api_key(html).unwrap(), "first");
    }

    #[test]
    fn test_missing_key() {
        let err = extract_api_key("<html><body>No key here</body></html>").unwrap_err();
        assert!(matches!(err, TraitError::NotFound(_)));
        assert!(err.to_string().contains("API key not found in HTML"));
    }

    #[test]
    fn test_empty_value_is_missing() {
        assert!(extract_api_key("apiKey: ''").is_err());
    }
}
