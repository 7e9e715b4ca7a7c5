//! Cached entry records and the freshness rule.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::Entry;

/// Default validity window of a cached entry (one year).
pub const CACHE_TTL_DAYS: i64 = 365;

/// One Record Store slot: an entry plus its fetch timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    /// Slot key, `entry_{id}`.
    pub key: String,
    /// First-insertion sequence number; preserved when the slot is overwritten.
    pub seq: u64,
    pub cached_at: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: Entry,
}

impl CachedEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        is_fresh_within(self.cached_at, now, ttl)
    }
}

/// Whether a record cached at `cached_at` is still trustworthy at `now`.
pub fn is_fresh(cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    is_fresh_within(cached_at, now, Duration::days(CACHE_TTL_DAYS))
}

/// Freshness against an explicit window. Timestamps in the future count as fresh.
pub fn is_fresh_within(cached_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(cached_at) < ttl
}
