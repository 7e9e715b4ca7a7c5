//! Blog entry types shared by the fetch adapter, the cache, and the tools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One blog post as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Entry {
    /// Member ID, the last path segment of the entry's edit URI.
    pub id: String,
    pub title: String,
    /// Entry body in the blog's editing syntax.
    #[serde(default)]
    pub body: String,
    /// Content type of `body` (e.g. `text/x-markdown`).
    #[serde(default)]
    pub content_type: Option<String>,
    /// Category terms in feed order, without duplicates.
    #[serde(default)]
    pub categories: Vec<String>,
    /// True if the entry is unpublished.
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    /// Public permalink (`link rel="alternate"`).
    #[serde(default)]
    pub url: Option<String>,
}

impl Entry {
    /// Create an entry with only an id and title set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            content_type: None,
            categories: Vec::new(),
            draft: false,
            published: None,
            updated: None,
            url: None,
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Push a category unless it is already present.
    pub fn add_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if !self.has_category(&category) {
            self.categories.push(category);
        }
    }
}

/// One page of the entry collection.
#[derive(Debug, Clone, Default)]
pub struct EntryPage {
    /// Entries in platform order (newest first).
    pub entries: Vec<Entry>,
    /// Opaque cursor for the following page, if any.
    pub next_cursor: Option<String>,
}
