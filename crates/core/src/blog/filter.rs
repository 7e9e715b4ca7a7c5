//! Keyword and draft filters.

use serde::{Deserialize, Serialize};

use crate::Entry;

/// How to treat an entry whose draft status could not be resolved from the cache.
///
/// `Published` keeps possibly-public content visible when the local cache is
/// incomplete. `Draft` hides anything not yet synced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDraftPolicy {
    #[default]
    Published,
    Draft,
}

/// Draft status of a listed entry as seen through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    Known(bool),
    Unknown,
}

impl DraftStatus {
    /// Collapse to a draft flag using `policy` for unknowns.
    pub fn resolve(self, policy: UnknownDraftPolicy) -> bool {
        match self {
            DraftStatus::Known(draft) => draft,
            DraftStatus::Unknown => policy == UnknownDraftPolicy::Draft,
        }
    }
}

/// Whether an entry with the given draft flag belongs in a listing.
pub fn include_entry(draft: bool, include_drafts: bool) -> bool {
    include_drafts || !draft
}

/// Case-insensitive keyword match over title, categories and optionally body.
///
/// `keyword_lower` must already be lowercased.
pub fn matches_keyword(entry: &Entry, keyword_lower: &str, search_in_content: bool) -> bool {
    if entry.title.to_lowercase().contains(keyword_lower) {
        return true;
    }

    if entry.categories.iter().any(|c| c.to_lowercase().contains(keyword_lower)) {
        return true;
    }

    search_in_content && entry.body.to_lowercase().contains(keyword_lower)
}
