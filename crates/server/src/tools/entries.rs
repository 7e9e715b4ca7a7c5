//! list_entries and get_entry tool implementations.

use chrono::{DateTime, Utc};
use hatena_core::{BlogService, Entry, EntrySource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{default_max_results, json_result};

/// Input parameters for list_entries tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListEntriesParams {
    /// Pagination URL from a previous `next_page_url` (omit for the newest entries).
    #[serde(default)]
    pub page_url: Option<String>,

    /// Maximum number of entries to return (1-100, default 10).
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Include unpublished drafts (default false).
    #[serde(default)]
    pub include_drafts: bool,
}

/// Entry metadata without the body.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntrySummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub draft: bool,
}

impl From<Entry> for EntrySummary {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            url: entry.url,
            published: entry.published,
            updated: entry.updated,
            categories: entry.categories,
            draft: entry.draft,
        }
    }
}

/// Output structure for list_entries tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListEntriesOutput {
    pub entries: Vec<EntrySummary>,
    /// Pass back as `page_url` to read the next page.
    pub next_page_url: Option<String>,
    pub count: usize,
}

/// Input parameters for get_entry tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetEntryParams {
    /// Entry ID as returned by list_entries.
    pub entry_id: String,
}

/// Output structure for get_entry tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntryDetail {
    #[serde(flatten)]
    pub entry: Entry,
    /// When the entry was last fetched from the blog.
    pub cached_at: DateTime<Utc>,
    /// Whether the entry was served from the local cache.
    pub cache_hit: bool,
}

/// Implementation of the list_entries tool.
pub async fn list_impl<S: EntrySource>(
    service: &BlogService<S>, params: ListEntriesParams,
) -> Result<CallToolResult, McpError> {
    let listing = service
        .list(params.page_url.as_deref(), params.max_results, params.include_drafts)
        .await?;

    let entries: Vec<EntrySummary> = listing.entries.into_iter().map(EntrySummary::from).collect();
    let output = ListEntriesOutput { count: entries.len(), entries, next_page_url: listing.next_cursor };

    json_result(&output)
}

/// Implementation of the get_entry tool.
pub async fn get_impl<S: EntrySource>(
    service: &BlogService<S>, params: GetEntryParams,
) -> Result<CallToolResult, McpError> {
    let lookup = service.get_or_fetch(params.entry_id.trim()).await?;

    let output = EntryDetail { entry: lookup.record.entry, cached_at: lookup.record.cached_at, cache_hit: lookup.cache_hit };
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{blog, output};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_list_defaults() {
        let (_dir, svc) = blog().await;
        let params: ListEntriesParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.max_results, 10);
        assert!(!params.include_drafts);

        let result = list_impl(&svc, params).await.unwrap();
        let out: ListEntriesOutput = output(&result);
        assert_eq!(out.count, 3);
        assert_eq!(out.next_page_url.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_list_hides_synced_drafts() {
        let (_dir, svc) = blog().await;
        svc.sync_all().await.unwrap();

        let params = ListEntriesParams { page_url: None, max_results: 10, include_drafts: false };
        let out: ListEntriesOutput = output(&list_impl(&svc, params).await.unwrap());
        let ids: Vec<_> = out.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_list_invalid_max_results() {
        let (_dir, svc) = blog().await;
        let params = ListEntriesParams { page_url: None, max_results: 0, include_drafts: false };
        let err = list_impl(&svc, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_get_entry_caches() {
        let (_dir, svc) = blog().await;

        let first: EntryDetail = output(&get_impl(&svc, GetEntryParams { entry_id: "B".into() }).await.unwrap());
        assert!(!first.cache_hit);
        assert!(first.entry.draft);
        assert_eq!(first.entry.body, "Beta body");

        let second: EntryDetail = output(&get_impl(&svc, GetEntryParams { entry_id: " B ".into() }).await.unwrap());
        assert!(second.cache_hit);
        assert_eq!(second.cached_at, first.cached_at);
        assert_eq!(svc.source().entry_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_entry_not_found() {
        let (_dir, svc) = blog().await;
        let err = get_impl(&svc, GetEntryParams { entry_id: "zzz".into() }).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }
}
