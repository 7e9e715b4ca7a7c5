//! File-backed cache of blog entries.
//!
//! This module provides the Record Store used by every listing and lookup:
//!
//! - One JSON file per entry, keyed by `entry_{id}`
//! - Write-to-temp-then-rename durability
//! - Lazy, time-based freshness (one year by default)
//! - Insertion-ordered scans for local search

pub mod key;
pub mod record;
pub mod store;

pub use key::slot_key;
pub use record::{CACHE_TTL_DAYS, CachedEntry, is_fresh, is_fresh_within};
pub use store::EntryStore;
