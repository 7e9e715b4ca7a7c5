//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::source::BlogSource;
use crate::tools::{
    CategoryEntriesParams, GetEntryParams, ListEntriesParams, SearchEntriesParams, by_category_impl,
    categories_impl, clear_impl, get_impl, list_impl, search_impl, sync_impl,
};

use hatena_core::BlogService;
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

/// The main MCP server handler for the Hatena Blog server.
#[derive(Clone)]
pub struct HatenaBlogServer {
    service: Arc<BlogService<BlogSource>>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl HatenaBlogServer {
    /// Create a new server handler around a shared blog service.
    pub fn new(service: Arc<BlogService<BlogSource>>) -> Self {
        Self { service, tool_router: Self::tool_router() }
    }

    fn service(&self) -> &BlogService<BlogSource> {
        &self.service
    }

    #[tool(description = "List blog entries, newest first. Drafts are hidden unless include_drafts is true. \
                          Pass next_page_url back as page_url to read older entries.")]
    async fn list_entries(&self, params: Parameters<ListEntriesParams>) -> Result<CallToolResult, McpError> {
        list_impl(self.service(), params.0).await
    }

    #[tool(description = "Get one blog entry with its full body. Served from the local cache when fresh.")]
    async fn get_entry(&self, params: Parameters<GetEntryParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.service(), params.0).await
    }

    #[tool(description = "Search cached entries by keyword in title, categories and body (case-insensitive). \
                          Results are in cache order, not ranked. Run sync_all_entries_to_cache first.")]
    async fn search_entries(&self, params: Parameters<SearchEntriesParams>) -> Result<CallToolResult, McpError> {
        search_impl(self.service(), params.0).await
    }

    #[tool(description = "List all categories with the number of entries in each, most used first.")]
    async fn get_categories(&self) -> Result<CallToolResult, McpError> {
        categories_impl(self.service()).await
    }

    #[tool(description = "List entries in a category (exact name match), walking pages until max_results are found. \
                          Pass next_page_url back as page_url to continue the walk.")]
    async fn get_entries_by_category(
        &self, params: Parameters<CategoryEntriesParams>,
    ) -> Result<CallToolResult, McpError> {
        by_category_impl(self.service(), params.0).await
    }

    #[tool(description = "Fetch every entry from the blog and refresh the local cache. Returns the number synced.")]
    async fn sync_all_entries_to_cache(&self) -> Result<CallToolResult, McpError> {
        sync_impl(self.service()).await
    }

    #[tool(description = "Delete every cached entry. Returns the number removed.")]
    async fn clear_blog_cache(&self) -> Result<CallToolResult, McpError> {
        clear_impl(self.service()).await
    }
}

impl ServerHandler for HatenaBlogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-hatena-blog".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Read-only access to a Hatena Blog. Entries are cached locally; \
                 search_entries only sees cached entries."
                    .into(),
            ),
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
