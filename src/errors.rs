use std::fmt;

/// Crate-wide error taxonomy.
///
/// Every fault is classified into exactly one of these kinds before it
/// crosses a component boundary; no raw error type reaches the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlShortError {
    /// The requested short id has no backing record.
    NotFound(String),
    /// The URL repository or access-log store raised an unexpected fault.
    StorageOperation(String),
    /// The key-value cache raised a fault. Never fails a request; kept in
    /// the taxonomy so call sites can classify before logging.
    CacheOperation(String),
    /// Malformed input rejected before any storage access.
    Validation(String),
    /// Bad or missing configuration at startup.
    Configuration(String),
}

impl UrlShortError {
    pub fn code(&self) -> &'static str {
        match self {
            UrlShortError::NotFound(_) => "E001",
            UrlShortError::StorageOperation(_) => "E002",
            UrlShortError::CacheOperation(_) => "E003",
            UrlShortError::Validation(_) => "E004",
            UrlShortError::Configuration(_) => "E005",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            UrlShortError::NotFound(_) => "Resource Not Found",
            UrlShortError::StorageOperation(_) => "Storage Operation Error",
            UrlShortError::CacheOperation(_) => "Cache Operation Error",
            UrlShortError::Validation(_) => "Validation Error",
            UrlShortError::Configuration(_) => "Configuration Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            UrlShortError::NotFound(msg) => msg,
            UrlShortError::StorageOperation(msg) => msg,
            UrlShortError::CacheOperation(msg) => msg,
            UrlShortError::Validation(msg) => msg,
            UrlShortError::Configuration(msg) => msg,
        }
    }
}

impl fmt::Display for UrlShortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for UrlShortError {}

// convenience constructors
impl UrlShortError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        UrlShortError::NotFound(msg.into())
    }

    pub fn storage_operation<T: Into<String>>(msg: T) -> Self {
        UrlShortError::StorageOperation(msg.into())
    }

    pub fn cache_operation<T: Into<String>>(msg: T) -> Self {
        UrlShortError::CacheOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        UrlShortError::Validation(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        UrlShortError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, UrlShortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(UrlShortError::not_found("x").code(), "E001");
        assert_eq!(UrlShortError::storage_operation("x").code(), "E002");
        assert_eq!(UrlShortError::cache_operation("x").code(), "E003");
        assert_eq!(UrlShortError::validation("x").code(), "E004");
        assert_eq!(UrlShortError::configuration("x").code(), "E005");
    }

    #[test]
    fn display_includes_type_and_message() {
        let err = UrlShortError::not_found("short id 'abc' has no record");
        assert_eq!(
            err.to_string(),
            "Resource Not Found: short id 'abc' has no record"
        );
    }
}
