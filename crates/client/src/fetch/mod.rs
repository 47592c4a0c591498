//! Network fetch layer.
//!
//! ### Contract
//! - `Ok` for every response the server produced, whatever its status.
//! - `Err` only when no response could be obtained (offline, refused,
//!   reset, timeout).
//! - Bodies are passed through whole, whatever their size.
//!
//! ### HTTP client
//! - Redirects followed up to a limit (default: 10)
//! - Request timeout is the network stack's own (default: 30s)
//! - gzip/brotli/deflate decoding, rustls

pub mod request;
pub mod response;
pub mod url;

use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use request::AssetRequest;
pub use response::AssetResponse;
pub use self::url::{UrlError, resolve};

use offcache_core::{AppConfig, Error};

/// Anything that can put a request on the wire.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, Error>;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "offcache/0.1")
    pub user_agent: String,

    /// Request timeout (default: 30s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "offcache/0.1".to_string(),
            timeout: Duration::from_millis(30_000),
            max_redirects: 10,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// reqwest-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

fn transport_error(url: &reqwest::Url, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{url}: {err}"))
    } else {
        Error::Network(format!("{url}: {err}"))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, Error> {
        let start = Instant::now();
        let url = request.url();

        let response = self
            .http
            .request(request.method().clone(), url.clone())
            .headers(request.headers().clone())
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();

        let body = response.bytes().await.map_err(|e| transport_error(url, &e))?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            method = %request.method(),
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            fetch_ms,
            content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            "network fetch complete"
        );

        Ok(AssetResponse::new(final_url, status, headers, body))
    }
}
