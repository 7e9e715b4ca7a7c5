//! get_categories and get_entries_by_category tool implementations.

use hatena_core::{BlogService, CategoryCount, EntrySource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{EntrySummary, default_max_results, json_result};

/// Output structure for get_categories tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoriesOutput {
    /// Categories by entry count, most used first.
    pub categories: Vec<CategoryCount>,
    pub total: usize,
}

/// Input parameters for get_entries_by_category tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryEntriesParams {
    /// Category name (exact match).
    pub category: String,

    /// Pagination URL from a previous `next_page_url` to resume the walk.
    #[serde(default)]
    pub page_url: Option<String>,

    /// Maximum number of entries to return (1-100, default 10).
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Include unpublished drafts (default false).
    #[serde(default)]
    pub include_drafts: bool,
}

/// Output structure for get_entries_by_category tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryEntriesOutput {
    pub entries: Vec<EntrySummary>,
    pub count: usize,
    pub category: String,
    /// Next unread page, if the walk stopped early. Pass back as `page_url`.
    pub next_page_url: Option<String>,
}

/// Implementation of the get_categories tool.
pub async fn categories_impl<S: EntrySource>(service: &BlogService<S>) -> Result<CallToolResult, McpError> {
    let categories = service.categories().await?;
    let output = CategoriesOutput { total: categories.len(), categories };

    json_result(&output)
}

/// Implementation of the get_entries_by_category tool.
pub async fn by_category_impl<S: EntrySource>(
    service: &BlogService<S>, params: CategoryEntriesParams,
) -> Result<CallToolResult, McpError> {
    let listing = service
        .entries_by_category(&params.category, params.page_url.as_deref(), params.max_results, params.include_drafts)
        .await?;

    let entries: Vec<EntrySummary> = listing.entries.into_iter().map(EntrySummary::from).collect();
    let output = CategoryEntriesOutput {
        count: entries.len(),
        entries,
        category: params.category,
        next_page_url: listing.next_cursor,
    };

    json_result(&output)
}
