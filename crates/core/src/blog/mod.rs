//! Cache-and-filter core over a remote blog.
//!
//! `BlogService` answers every tool call. It reads through the `EntryStore`,
//! falls back to an `EntrySource` for anything missing or stale, and applies
//! the keyword and draft filters.

pub mod filter;
pub mod service;

pub use filter::{DraftStatus, UnknownDraftPolicy};
pub use service::{BlogService, EntryListing, EntryLookup, MAX_RESULTS_LIMIT, SyncReport};

use std::collections::HashMap;

use crate::{EntryPage, Error, entry::Entry};

/// Category name with the number of entries carrying it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Remote source of entries (the blog platform).
#[async_trait::async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch one page of the entry collection, starting at `cursor` or the newest page.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<EntryPage, Error>;

    /// Fetch a single entry. Returns `Error::NotFound` if it does not exist upstream.
    async fn fetch_entry(&self, entry_id: &str) -> Result<Entry, Error>;

    /// Count entries per category across every page.
    async fn fetch_categories(&self) -> Result<HashMap<String, usize>, Error> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.fetch_page(cursor.as_deref()).await?;
            for entry in &page.entries {
                for category in &entry.categories {
                    *counts.entry(category.clone()).or_default() += 1;
                }
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(counts)
    }
}
