//! cache_get tool implementation.
//!
//! Retrieves the current generation's entry for a request.

use offcache_client::{CacheRouter, Fetcher};
use offcache_core::{CacheEntry, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// URL of the cached request. Relative paths resolve against the application origin.
    pub url: String,

    /// HTTP method of the cached request (default: GET).
    #[serde(default)]
    pub method: Option<String>,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    /// Generation the entry was read from.
    pub generation: String,
    pub key: String,
    pub url: String,
    pub status: u16,
    pub status_text: String,
    /// Header values decoded as UTF-8 (lossy).
    pub headers: Vec<(String, String)>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
    pub stored_at: String,
}

impl CacheGetOutput {
    fn new(generation: String, entry: CacheEntry) -> Self {
        Self {
            generation,
            body: String::from_utf8_lossy(&entry.body).into_owned(),
            key: entry.key,
            url: entry.url,
            status: entry.status,
            status_text: entry.status_text,
            headers: entry
                .headers
                .into_iter()
                .map(|(name, value)| (name, String::from_utf8_lossy(&value).into_owned()))
                .collect(),
            stored_at: entry.stored_at,
        }
    }
}

/// Implementation of the cache_get tool.
pub async fn get_impl<F: Fetcher>(router: &CacheRouter<F>, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let request = router.request(params.method.as_deref().unwrap_or("GET"), &params.url)?;
    let current = router.current();

    let entry = current
        .get(&request.identity())
        .await?
        .ok_or_else(|| Error::CacheMiss(request.url().to_string()))?;

    let output = CacheGetOutput::new(current.name().to_string(), entry);
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize entry: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
