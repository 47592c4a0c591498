//! Request router and cache policy.
//!
//! One [`CacheRouter`] is built at startup and handed to whatever wires up
//! the hosting request pipeline. It owns three lifecycle hooks, run in order:
//!
//! 1. [`install`](CacheRouter::install): pre-populate the current generation
//!    with the static asset list, all or nothing.
//! 2. [`activate`](CacheRouter::activate): delete every generation except the
//!    current one.
//! 3. [`handle`](CacheRouter::handle): per request, network first; cache the
//!    duplicate of every same-origin 200; fall back to the cache and then to
//!    a synthetic 503 when the network fails.
//!
//! External origins bypass the cache in both directions.

mod activate;
mod install;
mod offline;

#[cfg(test)]
pub(crate) mod mock;

use offcache_core::{AppConfig, CacheDb, Error, Generation};
use reqwest::{Method, StatusCode, Url};
use tokio::sync::RwLock;

use crate::fetch::{AssetRequest, AssetResponse, Fetcher, resolve};
use crate::origin::{OriginClass, OriginClassifier};

pub use activate::ActivationReport;
pub use offline::{OFFLINE_BODY, unavailable};

/// Static router configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Name of the current cache generation.
    pub cache_name: String,
    /// Origin the relative asset paths are resolved against.
    pub base: Url,
    /// Assets fetched and stored at install time.
    pub static_assets: Vec<String>,
    /// Host substrings that bypass the cache.
    pub external_origins: Vec<String>,
}

impl RouterConfig {
    pub fn from_app(config: &AppConfig) -> Result<Self, Error> {
        let base = config.base().map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            cache_name: config.cache_name.clone(),
            base,
            static_assets: config.static_assets.clone(),
            external_origins: config.external_origins.clone(),
        })
    }
}

/// Lifecycle position of a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Installed,
    Activated,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pending => "pending",
            Phase::Installed => "installed",
            Phase::Activated => "activated",
        }
    }
}

/// Where a handled response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Network,
    Cache,
    /// Synthetic 503: network failed and nothing was cached.
    Offline,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Network => "network",
            Source::Cache => "cache",
            Source::Offline => "offline",
        }
    }
}

/// A response together with its provenance.
#[derive(Debug, Clone)]
pub struct Served {
    pub response: AssetResponse,
    pub source: Source,
}

impl Served {
    fn new(response: AssetResponse, source: Source) -> Self {
        Self { response, source }
    }
}

/// Network-first router with cache fallback.
pub struct CacheRouter<F> {
    fetcher: F,
    cache: CacheDb,
    config: RouterConfig,
    classifier: OriginClassifier,
    phase: RwLock<Phase>,
}

impl<F: Fetcher> CacheRouter<F> {
    pub fn new(fetcher: F, cache: CacheDb, config: RouterConfig) -> Self {
        let classifier = OriginClassifier::new(config.external_origins.iter().cloned());
        Self { fetcher, cache, config, classifier, phase: RwLock::new(Phase::Pending) }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &CacheDb {
        &self.cache
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.read().await
    }

    async fn set_phase(&self, phase: Phase) {
        *self.phase.write().await = phase;
    }

    /// The generation all reads and writes go to.
    pub fn current(&self) -> Generation {
        self.cache.generation(&self.config.cache_name)
    }

    /// Build a request from a method name and a possibly relative URL.
    pub fn request(&self, method: &str, url: &str) -> Result<AssetRequest, Error> {
        let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::InvalidInput(format!("invalid HTTP method: {method}")))?;
        let url = resolve(&self.config.base, url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(AssetRequest::new(method, url))
    }

    /// Serve one intercepted request.
    ///
    /// Same-origin requests always resolve to a response. Only an external
    /// request can return `Err`, carrying its network failure unmodified.
    pub async fn handle(&self, request: AssetRequest) -> Result<Served, Error> {
        match self.classifier.classify(request.url()) {
            OriginClass::External => {
                tracing::debug!(url = %request.url(), "external origin, bypassing cache");
                let response = self.fetcher.fetch(&request).await?;
                Ok(Served::new(response, Source::Network))
            }
            OriginClass::SameOrigin => Ok(self.network_first(&request).await),
        }
    }

    async fn network_first(&self, request: &AssetRequest) -> Served {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.status == StatusCode::OK {
                    self.store(request, response.clone()).await;
                }
                Served::new(response, Source::Network)
            }
            Err(err) => {
                tracing::debug!(url = %request.url(), error = %err, "network failed, trying cache");
                self.fallback(request).await
            }
        }
    }

    /// Write a duplicate of a 200 response. Failures only lose the cache update.
    async fn store(&self, request: &AssetRequest, duplicate: AssetResponse) {
        if !request.is_cacheable_method() {
            tracing::debug!(method = %request.method(), url = %request.url(), "method not cacheable");
            return;
        }

        let entry = duplicate.to_entry(request);
        if let Err(err) = self.current().put(&entry).await {
            tracing::warn!(url = %request.url(), error = %err, "failed to update cache");
        }
    }

    async fn fallback(&self, request: &AssetRequest) -> Served {
        match self.current().get(&request.identity()).await {
            Ok(Some(entry)) => match AssetResponse::from_entry(entry) {
                Ok(cached) => {
                    tracing::info!(url = %request.url(), "Serving from cache");
                    return Served::new(cached, Source::Cache);
                }
                Err(err) => tracing::warn!(url = %request.url(), error = %err, "discarding unreadable cache entry"),
            },
            Ok(None) => {}
            Err(err) => tracing::warn!(url = %request.url(), error = %err, "cache lookup failed"),
        }

        tracing::info!(url = %request.url(), "No cache available");
        Served::new(unavailable(request.url()), Source::Offline)
    }
}
