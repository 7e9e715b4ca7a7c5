//! sync_all_entries_to_cache and clear_blog_cache tool implementations.

use hatena_core::{BlogService, EntrySource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Output from the sync_all_entries_to_cache tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncOutput {
    /// Number of entries written to the cache.
    pub synced: usize,
    /// Number of collection pages read.
    pub pages: usize,
}

/// Output from the clear_blog_cache tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClearOutput {
    /// Number of cached entries deleted.
    pub removed: u64,
}

/// Implementation of the sync_all_entries_to_cache tool.
pub async fn sync_impl<S: EntrySource>(service: &BlogService<S>) -> Result<CallToolResult, McpError> {
    let report = service.sync_all().await?;
    json_result(&SyncOutput { synced: report.synced, pages: report.pages })
}

/// Implementation of the clear_blog_cache tool.
pub async fn clear_impl<S: EntrySource>(service: &BlogService<S>) -> Result<CallToolResult, McpError> {
    let removed = service.clear().await?;
    json_result(&ClearOutput { removed })
}
