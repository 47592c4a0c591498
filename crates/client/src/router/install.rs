//! Install-time pre-population of the current generation.

use futures_util::future::try_join_all;
use offcache_core::{CacheEntry, Error, Generation};

use super::{CacheRouter, Phase};
use crate::fetch::{AssetRequest, Fetcher, resolve};

impl<F: Fetcher> CacheRouter<F> {
    /// Fetch every static asset and commit them as one transaction.
    ///
    /// Any transport failure or non-2xx status aborts the install with
    /// [`Error::PrecacheFailed`] and leaves the store untouched.
    pub async fn install(&self) -> Result<Generation, Error> {
        tracing::info!(cache = %self.config.cache_name, "Installing");

        let requests = self
            .config
            .static_assets
            .iter()
            .map(|path| {
                resolve(&self.config.base, path)
                    .map(AssetRequest::get)
                    .map_err(|e| Error::PrecacheFailed { url: path.clone(), reason: e.to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(cache = %self.config.cache_name, assets = requests.len(), "Caching static assets");

        let entries = try_join_all(requests.iter().map(|request| self.precache(request))).await?;
        let generation = self.cache.install_generation(&self.config.cache_name, entries).await?;

        self.set_phase(Phase::Installed).await;
        tracing::info!(cache = %self.config.cache_name, "Installed");

        Ok(generation)
    }

    /// Install, or keep the generation an earlier run already installed.
    ///
    /// A failed install is only fatal when the current generation does not
    /// exist yet. Otherwise its entries stay in service, untouched.
    pub async fn install_or_keep(&self) -> Result<Generation, Error> {
        let err = match self.install().await {
            Ok(generation) => return Ok(generation),
            Err(err) => err,
        };

        if !self.cache.has_generation(&self.config.cache_name).await? {
            return Err(err);
        }

        tracing::warn!(cache = %self.config.cache_name, error = %err, "install failed, keeping existing cache");
        self.set_phase(Phase::Installed).await;
        Ok(self.current())
    }

    async fn precache(&self, request: &AssetRequest) -> Result<CacheEntry, Error> {
        let failed = |reason: String| Error::PrecacheFailed { url: request.url().to_string(), reason };

        let response = self.fetcher.fetch(request).await.map_err(|e| failed(e.to_string()))?;
        if !response.status.is_success() {
            return Err(failed(format!("status {}", response.status.as_u16())));
        }

        Ok(response.to_entry(request))
    }
}

#[cfg(test)]
mod tests {
    use crate::fetch::AssetRequest;
    use crate::router::mock::{MockFetcher, router_with};
    use crate::router::{Phase, Source};
    use offcache_core::Error;
    use reqwest::Url;

    const ROOT: &str = "http://localhost:8080/";
    const INDEX: &str = "http://localhost:8080/index.html";

    #[tokio::test]
    async fn test_install_populates_exactly_static_assets() {
        let router = router_with(MockFetcher::new()).await;
        router.fetcher().respond(ROOT, 200, "root");
        router.fetcher().respond(INDEX, 200, "index");

        let generation = router.install().await.unwrap();

        assert_eq!(generation.name(), "bg-remover-v1");
        assert_eq!(router.cache().generation_names().await.unwrap(), vec!["bg-remover-v1"]);
        assert_eq!(generation.len().await.unwrap(), 2);

        let mut urls = generation.urls().await.unwrap();
        urls.sort();
        assert_eq!(urls, vec![ROOT, INDEX]);
        assert_eq!(router.phase().await, Phase::Installed);
        assert_eq!(router.fetcher().calls(), 2);
    }

    #[tokio::test]
    async fn test_install_fails_whole_on_network_error() {
        let router = router_with(MockFetcher::new()).await;
        router.fetcher().respond(ROOT, 200, "root");
        router.fetcher().fail(INDEX);

        let result = router.install().await;

        assert!(matches!(result, Err(Error::PrecacheFailed { ref url, .. }) if url == INDEX));
        assert!(router.cache().generation_names().await.unwrap().is_empty());
        assert!(router.current().is_empty().await.unwrap());
        assert_eq!(router.phase().await, Phase::Pending);
    }

    #[tokio::test]
    async fn test_install_fails_whole_on_error_status() {
        let router = router_with(MockFetcher::new()).await;
        router.fetcher().respond(ROOT, 200, "root");
        router.fetcher().respond(INDEX, 404, "gone");

        let result = router.install().await;

        assert!(matches!(result, Err(Error::PrecacheFailed { ref reason, .. }) if reason == "status 404"));
        assert!(router.current().is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_install_keeps_entries_written_before() {
        let router = router_with(MockFetcher::new()).await;
        router.fetcher().respond(ROOT, 200, "root");
        router.fetcher().respond(INDEX, 200, "index");
        router.install().await.unwrap();

        router.fetcher().fail(INDEX);
        assert!(router.install().await.is_err());

        assert_eq!(router.current().len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_install_or_keep_serves_existing_generation_offline() {
        let router = router_with(MockFetcher::new()).await;
        router.current().put(&router.fetcher().entry(INDEX, "from last run")).await.unwrap();

        let generation = router.install_or_keep().await.unwrap();
        assert_eq!(generation.name(), "bg-remover-v1");
        assert_eq!(router.phase().await, Phase::Installed);
        assert_eq!(router.current().len().await.unwrap(), 1);

        router.activate().await;
        let served = router.handle(AssetRequest::get(Url::parse(INDEX).unwrap())).await.unwrap();
        assert_eq!(served.source, Source::Cache);
        assert_eq!(served.response.text(), "from last run");
    }

    #[tokio::test]
    async fn test_install_or_keep_first_install_failure_is_fatal() {
        let router = router_with(MockFetcher::new()).await;
        router.cache().open_generation("bg-remover-v0").await.unwrap();

        let result = router.install_or_keep().await;

        assert!(matches!(result, Err(Error::PrecacheFailed { .. })));
        assert!(!router.cache().has_generation("bg-remover-v1").await.unwrap());
        assert_eq!(router.phase().await, Phase::Pending);
    }
}
