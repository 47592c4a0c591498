//! Outgoing request description.

use offcache_core::compute_request_key;
use reqwest::{Method, Url, header::HeaderMap};

/// A request issued by the hosted page.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
}

impl AssetRequest {
    /// Build a request. The URL fragment is dropped; it never reaches the network.
    pub fn new(method: Method, mut url: Url) -> Self {
        url.set_fragment(None);
        Self { method, url, headers: HeaderMap::new() }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Attach request headers forwarded to the network as-is.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Cache key for this request: method plus URL.
    pub fn identity(&self) -> String {
        compute_request_key(self.method.as_str(), self.url.as_str())
    }

    /// Only GET responses may be written to the cache.
    pub fn is_cacheable_method(&self) -> bool {
        self.method == Method::GET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_dropped() {
        let request = AssetRequest::get(Url::parse("http://localhost:8080/index.html#top").unwrap());
        assert_eq!(request.url().as_str(), "http://localhost:8080/index.html");
    }

    #[test]
    fn test_identity_ignores_fragment() {
        let plain = AssetRequest::get(Url::parse("http://localhost:8080/").unwrap());
        let anchored = AssetRequest::get(Url::parse("http://localhost:8080/#section").unwrap());
        assert_eq!(plain.identity(), anchored.identity());
    }

    #[test]
    fn test_identity_depends_on_method() {
        let url = Url::parse("http://localhost:8080/").unwrap();
        let get = AssetRequest::get(url.clone());
        let head = AssetRequest::new(Method::HEAD, url);
        assert_ne!(get.identity(), head.identity());
        assert!(get.is_cacheable_method());
        assert!(!head.is_cacheable_method());
    }
}
