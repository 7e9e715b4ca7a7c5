//! MCP tool implementations.
//!
//! This module contains all tools exposed by the Hatena Blog server. Each
//! `*_impl` function is generic over the entry source so tests can drive it
//! with an in-memory blog.
#![allow(unused_imports)]

pub mod cache;
pub mod categories;
pub mod entries;
pub mod search;

pub use cache::{ClearOutput, SyncOutput, clear_impl, sync_impl};
pub use categories::{CategoriesOutput, CategoryEntriesOutput, CategoryEntriesParams, categories_impl, by_category_impl};
pub use entries::{EntryDetail, EntrySummary, GetEntryParams, ListEntriesOutput, ListEntriesParams, get_impl, list_impl};
pub use search::{SearchEntriesOutput, SearchEntriesParams, search_impl};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

fn default_max_results() -> usize {
    10
}

fn default_true() -> bool {
    true
}

/// Serialize a tool output as pretty JSON text content.
fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("failed to serialize output: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
