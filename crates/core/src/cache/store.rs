//! File-backed Record Store.
//!
//! Each cached entry is one JSON file in the cache directory. Writes land in a
//! temporary sibling and are renamed into place, serialized by a single async
//! mutex so two writers never interleave on the same slot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use super::key::{is_slot_file_name, slot_file_name, slot_key};
use super::record::CachedEntry;
use crate::{Entry, Error};

const TEMP_SUFFIX: &str = ".tmp";

/// Directory of cached entries.
#[derive(Debug)]
pub struct EntryStore {
    dir: PathBuf,
    ttl: Duration,
    next_seq: AtomicU64,
    write_lock: Mutex<()>,
}

impl EntryStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// Existing slots are scanned once to continue the insertion sequence.
    pub async fn open(dir: impl AsRef<Path>, ttl: Duration) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::storage(&format!("failed to create {}", dir.display()), e))?;

        let store = Self { dir, ttl, next_seq: AtomicU64::new(0), write_lock: Mutex::new(()) };

        let max_seq = store.scan().await?.iter().map(|r| r.seq + 1).max().unwrap_or(0);
        store.next_seq.store(max_seq, Ordering::SeqCst);

        tracing::debug!(dir = %store.dir.display(), next_seq = max_seq, "opened entry store");

        Ok(store)
    }

    fn slot_path(&self, entry_id: &str) -> PathBuf {
        self.dir.join(slot_file_name(entry_id))
    }

    /// Read a slot regardless of freshness.
    ///
    /// Returns None if no slot exists for the id.
    pub async fn get(&self, entry_id: &str) -> Result<Option<CachedEntry>, Error> {
        let record = read_slot(&self.slot_path(entry_id)).await?;
        Ok(record.filter(|r| r.entry.id == entry_id))
    }

    /// Read a slot only if it is still fresh at `now`.
    pub async fn get_fresh(&self, entry_id: &str, now: DateTime<Utc>) -> Result<Option<CachedEntry>, Error> {
        let record = self.get(entry_id).await?;
        Ok(record.filter(|r| r.is_fresh(now, self.ttl)))
    }

    /// Create or overwrite the slot for `entry`, stamping it with `now`.
    pub async fn put(&self, entry: &Entry, now: DateTime<Utc>) -> Result<CachedEntry, Error> {
        if entry.id.is_empty() {
            return Err(Error::InvalidInput("entry id cannot be empty".into()));
        }

        let _guard = self.write_lock.lock().await;

        let path = self.slot_path(&entry.id);
        let seq = match read_slot(&path).await {
            Ok(Some(existing)) => existing.seq,
            Ok(None) => self.next_seq.fetch_add(1, Ordering::SeqCst),
            Err(e) => {
                tracing::warn!(entry_id = %entry.id, "replacing unreadable slot: {e}");
                self.next_seq.fetch_add(1, Ordering::SeqCst)
            }
        };

        let record = CachedEntry { key: slot_key(&entry.id), seq, cached_at: now, entry: entry.clone() };
        let json = serde_json::to_vec_pretty(&record).map_err(|e| Error::storage("failed to encode entry", e))?;

        let tmp = temp_path(&path);
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| Error::storage(&format!("failed to write {}", tmp.display()), e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::warn!(path = %tmp.display(), "failed to remove temp file: {cleanup}");
            }
            return Err(Error::storage(&format!("failed to rename into {}", path.display()), e));
        }

        Ok(record)
    }

    /// All readable slots in insertion order.
    ///
    /// Slots that cannot be read or decoded are logged and skipped.
    pub async fn scan(&self) -> Result<Vec<CachedEntry>, Error> {
        let mut records = Vec::new();
        for path in self.slot_files().await? {
            match read_slot(&path).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => tracing::warn!(path = %path.display(), "skipping unreadable slot: {e}"),
            }
        }

        records.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.key.cmp(&b.key)));
        Ok(records)
    }

    /// Number of slot files on disk.
    pub async fn len(&self) -> Result<usize, Error> {
        Ok(self.slot_files().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len().await? == 0)
    }

    /// Remove every slot, returning how many were removed.
    pub async fn clear(&self) -> Result<u64, Error> {
        let _guard = self.write_lock.lock().await;

        let mut removed = 0u64;
        for path in self.slot_files().await? {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(Error::storage(&format!("failed to remove {}", path.display()), e)),
            }
        }

        Ok(removed)
    }

    async fn slot_files(&self) -> Result<Vec<PathBuf>, Error> {
        let mut dir = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::storage(&format!("failed to read {}", self.dir.display()), e))?;

        let mut paths = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| Error::storage(&format!("failed to read {}", self.dir.display()), e))?
        {
            if item.file_name().to_str().is_some_and(is_slot_file_name) {
                paths.push(item.path());
            }
        }

        Ok(paths)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

async fn read_slot(path: &Path) -> Result<Option<CachedEntry>, Error> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::storage(&format!("failed to read {}", path.display()), e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| Error::storage(&format!("corrupt slot {}", path.display()), e))
}
