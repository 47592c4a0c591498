//! MCP server handler implementation.
//!
//! This module defines the host handler that routes tool calls to the
//! router owned by this process.
use std::sync::Arc;

use crate::tools::asset_fetch::{AssetFetchParams, fetch_impl};
use crate::tools::cache::{CacheGetParams, CacheListParams, get_impl, list_impl};
use offcache_client::{CacheRouter, HttpFetcher};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The MCP handler for the offcache host.
#[derive(Clone)]
pub struct OffcacheServer {
    router: Arc<CacheRouter<HttpFetcher>>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl OffcacheServer {
    /// Create a handler around an installed and activated router.
    pub fn new(router: Arc<CacheRouter<HttpFetcher>>) -> Self {
        Self { router, tool_router: Self::tool_router() }
    }

    /// Serve one request through the cache policy.
    #[tool(
        description = "Request a URL through the offline cache layer. Same-origin requests are network-first with cache fallback; external origins bypass the cache."
    )]
    async fn asset_fetch(&self, params: Parameters<AssetFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(self.router.as_ref(), params.0).await
    }

    /// Read a cached response from the current generation.
    #[tool(description = "Read the cached response for a request from the current cache generation.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.router.as_ref(), params.0).await
    }

    /// List cache generations and cached URLs.
    #[tool(description = "List cache generations, the router phase, and the URLs cached in a generation.")]
    async fn cache_list(&self, params: Parameters<CacheListParams>) -> Result<CallToolResult, McpError> {
        list_impl(self.router.as_ref(), params.0).await
    }
}

impl ServerHandler for OffcacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "offcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
