//! offcache host entry point.
//!
//! Builds the one router for this process, runs its install and activate
//! hooks in order, then serves the per-request hook over MCP stdio.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use offcache_client::{CacheRouter, FetchConfig, HttpFetcher, RouterConfig};
use offcache_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(cache = %config.cache_name, base = %config.base_url, "Starting offcache on stdio transport");

    let cache = CacheDb::open(&config.db_path).await?;
    let fetcher = HttpFetcher::new(&FetchConfig::from(&config))?;
    let router = Arc::new(CacheRouter::new(fetcher, cache, RouterConfig::from_app(&config)?));

    router.install_or_keep().await?;
    let report = router.activate().await;
    tracing::info!(deleted = report.deleted.len(), failed = report.failed.len(), "Activated");

    let handler = handler::OffcacheServer::new(router);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
