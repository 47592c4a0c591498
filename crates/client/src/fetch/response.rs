//! Response description shared by the network and the cache.
//!
//! The body is reference-counted [`Bytes`], so `clone()` is the explicit,
//! cheap duplication the router performs before handing one copy to the
//! cache and the other to the caller.

use std::borrow::Cow;

use bytes::Bytes;
use offcache_core::{CacheEntry, Error};
use reqwest::{
    StatusCode, Url,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};

use super::AssetRequest;

/// A complete, buffered HTTP response.
#[derive(Debug, Clone)]
pub struct AssetResponse {
    /// The URL that produced this response (after redirects).
    pub url: Url,
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl AssetResponse {
    /// Build a response with the canonical reason phrase for `status`.
    pub fn new(url: Url, status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        Self { url, status, status_text, headers, body: body.into() }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Snapshot this response as a cache entry for `request`.
    pub fn to_entry(&self, request: &AssetRequest) -> CacheEntry {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
            .collect();

        CacheEntry {
            key: request.identity(),
            method: request.method().as_str().to_string(),
            url: request.url().as_str().to_string(),
            status: self.status.as_u16(),
            status_text: self.status_text.clone(),
            headers,
            body: self.body.to_vec(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuild a response from a stored entry.
    pub fn from_entry(entry: CacheEntry) -> Result<Self, Error> {
        let url = Url::parse(&entry.url).map_err(|e| Error::CorruptEntry(format!("url {}: {e}", entry.url)))?;
        let status =
            StatusCode::from_u16(entry.status).map_err(|e| Error::CorruptEntry(format!("status {}: {e}", entry.status)))?;

        let mut headers = HeaderMap::with_capacity(entry.headers.len());
        for (name, value) in entry.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::CorruptEntry(format!("header name {name}: {e}")))?;
            let value =
                HeaderValue::from_bytes(&value).map_err(|e| Error::CorruptEntry(format!("header {name}: {e}")))?;
            headers.append(name, value);
        }

        Ok(Self { url, status, status_text: entry.status_text, headers, body: Bytes::from(entry.body) })
    }
}
