//! Asset URL resolution against the application origin.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a possibly relative URL against the application base.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Join relative paths (`./`, `index.html`) onto `base`; absolute URLs pass through
/// 3. Accept only http/https
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn resolve(base: &Url, input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut resolved = base.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match resolved.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    resolved.set_fragment(None);

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8080/app/").unwrap()
    }

    #[test]
    fn test_resolve_dot_slash() {
        let url = resolve(&base(), "./").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/app/");
    }

    #[test]
    fn test_resolve_relative_file() {
        let url = resolve(&base(), "index.html").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/app/index.html");
    }

    #[test]
    fn test_resolve_root_relative() {
        let url = resolve(&base(), "/favicon.ico").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/favicon.ico");
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let url = resolve(&base(), "https://cdn.jsdelivr.net/npm/lib.js").unwrap();
        assert_eq!(url.host_str(), Some("cdn.jsdelivr.net"));
    }

    #[test]
    fn test_resolve_lowercases_host() {
        let url = resolve(&base(), "HTTPS://CDN.JSDELIVR.NET/x").unwrap();
        assert_eq!(url.host_str(), Some("cdn.jsdelivr.net"));
    }

    #[test]
    fn test_resolve_strips_fragment_keeps_query() {
        let url = resolve(&base(), "index.html?v=2#hero").unwrap();
        assert_eq!(url.query(), Some("v=2"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve(&base(), "data:text/plain,hello");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve(&base(), ""), Err(UrlError::Empty)));
        assert!(matches!(resolve(&base(), "   "), Err(UrlError::Empty)));
    }
}
