//! Static origin classification.
//!
//! Requests whose serialized origin contains one of the configured host
//! substrings are external: they go straight to the network and never touch
//! the cache. Everything else is treated as same-origin and cacheable.

use reqwest::Url;

/// Which caching class a request falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginClass {
    External,
    SameOrigin,
}

/// Substring matcher over request origins.
#[derive(Debug, Clone, Default)]
pub struct OriginClassifier {
    external: Vec<String>,
}

impl OriginClassifier {
    pub fn new<I, S>(external: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { external: external.into_iter().map(Into::into).collect() }
    }

    pub fn classify(&self, url: &Url) -> OriginClass {
        let origin = url.origin().ascii_serialization();
        if self.external.iter().any(|host| origin.contains(host.as_str())) {
            OriginClass::External
        } else {
            OriginClass::SameOrigin
        }
    }

    pub fn is_external(&self, url: &Url) -> bool {
        self.classify(url) == OriginClass::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> OriginClassifier {
        OriginClassifier::new(["cdn.jsdelivr.net", "cdnjs.cloudflare.com", "imgly.io", "googlesyndication.com", "google.com"])
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_cdn_is_external() {
        let c = classifier();
        assert_eq!(c.classify(&url("https://cdn.jsdelivr.net/npm/onnx@1/dist/ort.js")), OriginClass::External);
        assert_eq!(c.classify(&url("https://cdnjs.cloudflare.com/ajax/libs/x.js")), OriginClass::External);
    }

    #[test]
    fn test_subdomain_matches_substring() {
        let c = classifier();
        assert!(c.is_external(&url("https://staticimgly.io/models/small.onnx")));
        assert!(c.is_external(&url("https://pagead2.googlesyndication.com/pagead/js")));
        assert!(c.is_external(&url("https://www.google.com/recaptcha")));
    }

    #[test]
    fn test_same_origin_is_cacheable() {
        let c = classifier();
        assert_eq!(c.classify(&url("http://localhost:8080/index.html")), OriginClass::SameOrigin);
        assert_eq!(c.classify(&url("https://bg-remover.example.org/app.js")), OriginClass::SameOrigin);
    }

    #[test]
    fn test_path_is_not_part_of_origin() {
        let c = classifier();
        assert!(!c.is_external(&url("http://localhost:8080/proxy/cdn.jsdelivr.net/lib.js")));
        assert!(!c.is_external(&url("http://localhost:8080/?ref=google.com")));
    }

    #[test]
    fn test_empty_classifier_caches_everything() {
        let c = OriginClassifier::default();
        assert!(!c.is_external(&url("https://cdn.jsdelivr.net/lib.js")));
    }
}
