//! Synthetic response for a same-origin request with no network and no cache.

use reqwest::{
    StatusCode, Url,
    header::{self, HeaderMap, HeaderValue},
};

use crate::fetch::AssetResponse;

pub const OFFLINE_BODY: &str = "Offline - resource not available";

/// `503 Service Unavailable` with a plain-text explanation.
pub fn unavailable(url: &Url) -> AssetResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    AssetResponse::new(url.clone(), StatusCode::SERVICE_UNAVAILABLE, headers, OFFLINE_BODY)
}
