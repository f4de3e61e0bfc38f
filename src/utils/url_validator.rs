//! Long-URL validation.
//!
//! Upstream middleware owns validation in the large, but the core still
//! rejects empty, non-http(s) and unparsable URLs before touching storage.

use url::Url;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// Checks that `input` is a well-formed http(s) URL.
pub fn validate_long_url(input: &str) -> Result<(), UrlValidationError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed =
        Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(UrlValidationError::InvalidProtocol(format!("{other}:"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_long_url("http://example.com").is_ok());
        assert!(validate_long_url("https://example.com/a/b?c=d").is_ok());
        assert!(validate_long_url("  https://example.com  ").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(validate_long_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_long_url("   "), Err(UrlValidationError::EmptyUrl));
    }

    #[test]
    fn rejects_dangerous_schemes() {
        for input in [
            "javascript:alert(1)",
            "data:text/html,hi",
            "file:///etc/passwd",
            "ftp://example.com",
        ] {
            match validate_long_url(input) {
                Err(UrlValidationError::InvalidProtocol(_)) => {}
                other => panic!("{input} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_unparsable() {
        match validate_long_url("not a url") {
            Err(UrlValidationError::InvalidFormat(_)) => {}
            other => panic!("expected format error, got {other:?}"),
        }
    }
}
