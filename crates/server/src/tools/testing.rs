//! Router fixtures for tool tests.
//!
//! The router points at a loopback port nobody listens on, so every
//! same-origin request fails at the network and exercises the cache path.

use offcache_client::{
    AssetResponse, CacheRouter, FetchConfig, HttpFetcher, RouterConfig, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use offcache_core::{AppConfig, CacheDb};

pub(crate) type TestRouter = CacheRouter<HttpFetcher>;

pub(crate) async fn offline_router() -> TestRouter {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = AppConfig { base_url: format!("http://{addr}/"), ..Default::default() };
    let config = RouterConfig::from_app(&app).unwrap();
    let fetcher = HttpFetcher::new(&FetchConfig::from(&app)).unwrap();
    let cache = CacheDb::open_in_memory().await.unwrap();

    CacheRouter::new(fetcher, cache, config)
}

/// Store `body` under the current generation as a 200 text/html response.
pub(crate) async fn seed(router: &TestRouter, path: &str, body: &str) {
    let request = router.request("GET", path).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    let response = AssetResponse::new(request.url().clone(), StatusCode::OK, headers, body.to_string());
    router.current().put(&response.to_entry(&request)).await.unwrap();
}
