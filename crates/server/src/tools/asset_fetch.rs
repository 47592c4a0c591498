//! asset_fetch tool implementation.
//!
//! Runs one request through the router, exactly as an intercepted page
//! request would be served.

use offcache_client::{
    CacheRouter, Fetcher,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use offcache_core::Error;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for asset_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetFetchParams {
    /// URL to request. Relative paths resolve against the application origin.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Request headers forwarded to the network, in order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

fn default_method() -> String {
    "GET".into()
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| Error::InvalidInput(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value).map_err(|e| Error::InvalidInput(format!("invalid header {name}: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}

/// Output structure for asset_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetFetchOutput {
    /// The resolved request URL.
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
    /// Where the response came from: "network", "cache" or "offline".
    pub source: String,
}

/// Implementation of the asset_fetch tool.
pub async fn fetch_impl<F: Fetcher>(router: &CacheRouter<F>, params: AssetFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let headers = header_map(&params.headers)?;
    let request = router.request(&params.method, &params.url)?.with_headers(headers);
    let url = request.url().to_string();
    let served = router.handle(request).await?;

    let response = &served.response;
    let output = AssetFetchOutput {
        url,
        status: response.status.as_u16(),
        status_text: response.status_text.clone(),
        headers: response
            .headers
            .iter()
            .map(|(name, value)| (name.to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect(),
        body: response.text().into_owned(),
        source: served.source.as_str().to_string(),
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize response: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
