//! Scripted [`Fetcher`] for router tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use offcache_core::{CacheDb, CacheEntry, Error};
use reqwest::{
    StatusCode, Url,
    header::{self, HeaderMap, HeaderValue},
};

use super::{CacheRouter, RouterConfig};
use crate::fetch::{AssetRequest, AssetResponse, Fetcher};

/// Replies keyed by URL. Unknown URLs fail as if offline.
#[derive(Default)]
pub(crate) struct MockFetcher {
    replies: Mutex<HashMap<String, Option<(u16, String)>>>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, url: &str, status: u16, body: &str) {
        self.replies.lock().unwrap().insert(url.to_string(), Some((status, body.to_string())));
    }

    pub(crate) fn fail(&self, url: &str) {
        self.replies.lock().unwrap().insert(url.to_string(), None);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A 200 text/html entry for `url`, as the router would have stored it.
    pub(crate) fn entry(&self, url: &str, body: &str) -> CacheEntry {
        let url = Url::parse(url).unwrap();
        html(url.clone(), 200, body).to_entry(&AssetRequest::get(url))
    }
}

fn html(url: Url, status: u16, body: &str) -> AssetResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
    AssetResponse::new(url, StatusCode::from_u16(status).unwrap(), headers, body.to_string())
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().get(request.url().as_str()).cloned().flatten();
        match reply {
            Some((status, body)) => Ok(html(request.url().clone(), status, &body)),
            None => Err(Error::Network(format!("{}: connection refused", request.url()))),
        }
    }
}

pub(crate) fn test_config() -> RouterConfig {
    RouterConfig {
        cache_name: "bg-remover-v1".to_string(),
        base: Url::parse("http://localhost:8080/").unwrap(),
        static_assets: vec!["./".to_string(), "index.html".to_string()],
        external_origins: ["cdn.jsdelivr.net", "cdnjs.cloudflare.com", "imgly.io", "googlesyndication.com", "google.com"]
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

pub(crate) async fn router_with(fetcher: MockFetcher) -> CacheRouter<MockFetcher> {
    let cache = CacheDb::open_in_memory().await.unwrap();
    CacheRouter::new(fetcher, cache, test_config())
}
