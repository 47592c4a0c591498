//! cache_list tool implementation.
//!
//! Lists cache generations and the URLs held by the current one.

use offcache_client::{CacheRouter, Fetcher};
use offcache_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheListParams {
    /// Generation to list entries for (default: the current one).
    #[serde(default)]
    pub generation: Option<String>,
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    /// Name of the current generation.
    pub current: String,
    /// Router lifecycle phase: "pending", "installed" or "activated".
    pub phase: String,
    /// Every generation present in the store.
    pub generations: Vec<String>,
    /// Generation whose entries are listed below.
    pub listed: String,
    /// URLs stored in the listed generation.
    pub urls: Vec<String>,
}

/// Implementation of the cache_list tool.
pub async fn list_impl<F: Fetcher>(router: &CacheRouter<F>, params: CacheListParams) -> Result<CallToolResult, McpError> {
    let cache = router.cache();
    let current = router.current();
    let listed = match params.generation {
        Some(name) => cache.generation(&name),
        None => current.clone(),
    };

    let output = CacheListOutput {
        current: current.name().to_string(),
        phase: router.phase().await.as_str().to_string(),
        generations: cache.generation_names().await?,
        listed: listed.name().to_string(),
        urls: listed.urls().await?,
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
