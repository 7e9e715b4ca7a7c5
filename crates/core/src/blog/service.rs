//! Cache-or-fetch lookups, listings, local search and full sync.

use chrono::{DateTime, Utc};

use super::filter::{DraftStatus, UnknownDraftPolicy, include_entry, matches_keyword};
use super::{CategoryCount, EntrySource};
use crate::cache::{CachedEntry, EntryStore};
use crate::{Entry, EntryPage, Error};

/// Upper bound accepted for `max_results`.
pub const MAX_RESULTS_LIMIT: usize = 100;

/// Ordered entries plus the cursor of the next unread page.
#[derive(Debug, Clone, Default)]
pub struct EntryListing {
    pub entries: Vec<Entry>,
    pub next_cursor: Option<String>,
}

/// A single-entry lookup and whether it was served from the cache.
#[derive(Debug, Clone)]
pub struct EntryLookup {
    pub record: CachedEntry,
    pub cache_hit: bool,
}

/// Outcome of a completed full sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub pages: usize,
}

/// The cache-and-filter core.
///
/// Holds the process-wide `EntryStore` and the remote `EntrySource`; both are
/// injected at construction so tests can swap either.
#[derive(Debug)]
pub struct BlogService<S> {
    source: S,
    store: EntryStore,
    policy: UnknownDraftPolicy,
}

impl<S: EntrySource> BlogService<S> {
    pub fn new(source: S, store: EntryStore, policy: UnknownDraftPolicy) -> Self {
        Self { source, store, policy }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the cached entry if fresh, otherwise fetch it and refresh the slot.
    ///
    /// A fetch failure leaves any stale slot untouched.
    pub async fn get_or_fetch(&self, entry_id: &str) -> Result<EntryLookup, Error> {
        if entry_id.trim().is_empty() {
            return Err(Error::InvalidInput("entry_id cannot be empty".into()));
        }

        let now = Utc::now();
        match self.store.get_fresh(entry_id, now).await {
            Ok(Some(record)) => {
                tracing::debug!(entry_id, "cache hit");
                return Ok(EntryLookup { record, cache_hit: true });
            }
            Ok(None) => tracing::debug!(entry_id, "cache miss"),
            Err(e) => tracing::warn!(entry_id, "treating unreadable slot as a miss: {e}"),
        }

        let mut entry = self.source.fetch_entry(entry_id).await?;
        entry.id = entry_id.to_string();

        let record = self.store.put(&entry, now).await?;
        Ok(EntryLookup { record, cache_hit: false })
    }

    /// One page of entries with draft filtering applied.
    ///
    /// Inclusion is decided by the cached draft status; entries with no fresh
    /// slot follow the configured `UnknownDraftPolicy`. The `draft` flag on a
    /// returned entry is set if either the cache or the page itself marks it as
    /// a draft, so an unsynced draft listed under the published policy still
    /// reports `draft: true`. The returned cursor is the page's own
    /// continuation even when `max_results` cut the page short.
    pub async fn list(
        &self, cursor: Option<&str>, max_results: usize, include_drafts: bool,
    ) -> Result<EntryListing, Error> {
        validate_max_results(max_results)?;

        let page = self.source.fetch_page(cursor).await?;
        let next_cursor = page.next_cursor.clone();
        let entries = self
            .filter_page(page, max_results, include_drafts, |_| true)
            .await;

        Ok(EntryListing { entries, next_cursor })
    }

    /// Keyword search over the local cache only.
    ///
    /// Matching is case-insensitive. Results follow cache insertion order and
    /// are not ranked. An empty cache yields an empty result.
    pub async fn search(
        &self, keyword: &str, max_results: usize, include_drafts: bool, search_in_content: bool,
    ) -> Result<Vec<Entry>, Error> {
        if keyword.trim().is_empty() {
            return Err(Error::InvalidInput("keyword cannot be empty".into()));
        }
        validate_max_results(max_results)?;

        let keyword_lower = keyword.to_lowercase();
        let results: Vec<Entry> = self
            .store
            .scan()
            .await?
            .into_iter()
            .map(|record| record.entry)
            .filter(|entry| include_entry(entry.draft, include_drafts))
            .filter(|entry| matches_keyword(entry, &keyword_lower, search_in_content))
            .take(max_results)
            .collect();

        tracing::debug!(keyword, matches = results.len(), "searched cache");
        Ok(results)
    }

    /// Entries carrying `category`, walking pages from `cursor` until
    /// `max_results` are found. Pass the returned cursor back to resume.
    pub async fn entries_by_category(
        &self, category: &str, cursor: Option<&str>, max_results: usize, include_drafts: bool,
    ) -> Result<EntryListing, Error> {
        if category.is_empty() {
            return Err(Error::InvalidInput("category cannot be empty".into()));
        }
        validate_max_results(max_results)?;

        let mut entries = Vec::new();
        let mut cursor: Option<String> = cursor.map(str::to_string);

        loop {
            let page = self.source.fetch_page(cursor.as_deref()).await?;
            let next_cursor = page.next_cursor.clone();

            let remaining = max_results - entries.len();
            let found = self
                .filter_page(page, remaining, include_drafts, |entry| entry.has_category(category))
                .await;
            entries.extend(found);

            match next_cursor {
                Some(next) if entries.len() < max_results => {
                    if cursor.as_deref() == Some(next.as_str()) {
                        tracing::warn!(cursor = %next, "source returned the same cursor twice; stopping");
                        return Ok(EntryListing { entries, next_cursor: None });
                    }
                    cursor = Some(next);
                }
                next => return Ok(EntryListing { entries, next_cursor: next }),
            }
        }
    }

    /// Category counts across the whole blog, most used first.
    pub async fn categories(&self) -> Result<Vec<CategoryCount>, Error> {
        let mut categories: Vec<CategoryCount> = self
            .source
            .fetch_categories()
            .await?
            .into_iter()
            .map(|(name, count)| CategoryCount { name, count })
            .collect();

        categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    /// Fetch every page and overwrite every slot, regardless of freshness.
    ///
    /// No rollback: a failure after some writes reports `SyncInterrupted` with
    /// the number already written.
    pub async fn sync_all(&self) -> Result<SyncReport, Error> {
        let mut report = SyncReport::default();
        let mut cursor: Option<String> = None;

        loop {
            let page = match self.source.fetch_page(cursor.as_deref()).await {
                Ok(page) => page,
                Err(e) => return Err(interrupted(report, e)),
            };
            report.pages += 1;

            let now = Utc::now();
            for entry in &page.entries {
                if let Err(e) = self.store.put(entry, now).await {
                    return Err(interrupted(report, e));
                }
                report.synced += 1;
            }

            tracing::debug!(page = report.pages, synced = report.synced, "synced page");

            match page.next_cursor {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => break,
            }
        }

        tracing::info!(synced = report.synced, pages = report.pages, "full sync complete");
        Ok(report)
    }

    /// Drop every cached slot.
    pub async fn clear(&self) -> Result<u64, Error> {
        let removed = self.store.clear().await?;
        tracing::info!(removed, "cleared entry cache");
        Ok(removed)
    }

    async fn filter_page(
        &self, page: EntryPage, limit: usize, include_drafts: bool, predicate: impl Fn(&Entry) -> bool,
    ) -> Vec<Entry> {
        let now = Utc::now();
        let mut kept = Vec::new();

        for mut entry in page.entries {
            if kept.len() >= limit {
                break;
            }
            if !predicate(&entry) {
                continue;
            }

            let draft = self.draft_status(&entry.id, now).await.resolve(self.policy);
            if !include_entry(draft, include_drafts) {
                continue;
            }

            entry.draft |= draft;
            kept.push(entry);
        }

        kept
    }

    async fn draft_status(&self, entry_id: &str, now: DateTime<Utc>) -> DraftStatus {
        match self.store.get_fresh(entry_id, now).await {
            Ok(Some(record)) => DraftStatus::Known(record.entry.draft),
            Ok(None) => DraftStatus::Unknown,
            Err(e) => {
                tracing::warn!(entry_id, "draft status unresolved: {e}");
                DraftStatus::Unknown
            }
        }
    }
}

fn validate_max_results(max_results: usize) -> Result<(), Error> {
    if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
        return Err(Error::InvalidInput(format!("max_results must be between 1 and {MAX_RESULTS_LIMIT}")));
    }
    Ok(())
}

fn interrupted(report: SyncReport, err: Error) -> Error {
    tracing::warn!(synced = report.synced, "full sync interrupted: {err}");
    if report.synced == 0 { err } else { Error::SyncInterrupted { synced: report.synced, reason: err.to_string() } }
}
