//! search_entries tool implementation.
//!
//! Searches the local entry cache; nothing is fetched. Run
//! sync_all_entries_to_cache first for complete results.

use hatena_core::{BlogService, EntrySource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{EntrySummary, default_max_results, default_true, json_result};

/// Input parameters for search_entries tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchEntriesParams {
    /// Keyword to look for (case-insensitive).
    pub keyword: String,

    /// Maximum number of matches (1-100, default 10).
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Include unpublished drafts (default false).
    #[serde(default)]
    pub include_drafts: bool,

    /// Also match against entry bodies (default true).
    #[serde(default = "default_true")]
    pub search_in_content: bool,
}

/// Output structure for search_entries tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchEntriesOutput {
    /// Matches in cache order (not ranked).
    pub entries: Vec<EntrySummary>,
    pub count: usize,
    pub keyword: String,
}

/// Implementation of the search_entries tool.
pub async fn search_impl<S: EntrySource>(
    service: &BlogService<S>, params: SearchEntriesParams,
) -> Result<CallToolResult, McpError> {
    let found = service
        .search(&params.keyword, params.max_results, params.include_drafts, params.search_in_content)
        .await?;

    let entries: Vec<EntrySummary> = found.into_iter().map(EntrySummary::from).collect();
    let output = SearchEntriesOutput { count: entries.len(), entries, keyword: params.keyword };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{blog, output};

    fn params(keyword: &str, include_drafts: bool) -> SearchEntriesParams {
        SearchEntriesParams { keyword: keyword.into(), max_results: 10, include_drafts, search_in_content: true }
    }

    #[tokio::test]
    async fn test_search_empty_cache() {
        let (_dir, svc) = blog().await;
        let out: SearchEntriesOutput = output(&search_impl(&svc, params("alpha", false)).await.unwrap());
        assert_eq!(out.count, 0);
        assert_eq!(out.keyword, "alpha");
    }

    #[tokio::test]
    async fn test_search_respects_drafts() {
        let (_dir, svc) = blog().await;
        svc.sync_all().await.unwrap();

        let out: SearchEntriesOutput = output(&search_impl(&svc, params("beta", false)).await.unwrap());
        assert_eq!(out.count, 0);

        let out: SearchEntriesOutput = output(&search_impl(&svc, params("beta", true)).await.unwrap());
        assert_eq!(out.count, 1);
        assert_eq!(out.entries[0].id, "B");
        assert!(out.entries[0].draft);
    }

    #[tokio::test]
    async fn test_search_defaults() {
        let params: SearchEntriesParams = serde_json::from_str(r#"{"keyword":"rust"}"#).unwrap();
        assert_eq!(params.max_results, 10);
        assert!(!params.include_drafts);
        assert!(params.search_in_content);
    }

    #[tokio::test]
    async fn test_search_empty_keyword() {
        let (_dir, svc) = blog().await;
        let err = search_impl(&svc, params("", false)).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
