//! File-backed response cache keyed by identifier.
//!
//! Every `put` reads the whole store, replaces one entry and rewrites the file.
//! Entries are never evicted; they simply stop counting once older than
//! [`CACHE_TTL_HOURS`]. There is no locking, so two concurrent writers race and the
//! last one to persist wins.

use crate::cache_validator::ValidatedCacheEntry;
use crate::models::NormalizedRecord;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Freshness window for cached lookups, in hours.
pub const CACHE_TTL_HOURS: i64 = 12;

pub fn cache_ttl() -> Duration {
    Duration::hours(CACHE_TTL_HOURS)
}

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// Fresh entry. `None` is a cached negative lookup.
    Hit(Option<NormalizedRecord>),
    Miss,
}

type Store = BTreeMap<String, ValidatedCacheEntry>;

#[derive(Debug, Clone)]
pub struct ResponseCache {
    path: PathBuf,
}

impl ResponseCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fresh, untampered entry for `id`, if any.
    pub async fn get(&self, id: &str) -> CacheLookup {
        self.get_at(id, Utc::now()).await
    }

    async fn get_at(&self, id: &str, now: DateTime<Utc>) -> CacheLookup {
        let mut store = self.load().await;
        let Some(entry) = store.remove(id) else {
            tracing::debug!("Cache MISS for {}", id);
            return CacheLookup::Miss;
        };

        if !entry.is_valid() {
            tracing::warn!("Cache validation failed for {}: checksum mismatch", id);
            return CacheLookup::Miss;
        }
        if !entry.is_fresh(now, cache_ttl()) {
            tracing::debug!("Cache entry for {} expired (fetched {})", id, entry.fetched_at);
            return CacheLookup::Miss;
        }

        tracing::debug!("Cache HIT for {}", id);
        CacheLookup::Hit(entry.data)
    }

    /// Stores `record` for `id` with the current time and persists the whole store.
    pub async fn put(&self, id: &str, record: Option<NormalizedRecord>) -> io::Result<()> {
        self.insert_entry(id, ValidatedCacheEntry::new(record, Utc::now()))
            .await
    }

    /// Stores a prepared entry as is, overwriting any previous one.
    pub async fn insert_entry(&self, id: &str, entry: ValidatedCacheEntry) -> io::Result<()> {
        let mut store = self.load().await;
        store.insert(id.to_string(), entry);
        self.save(&store).await
    }

    /// Raw entry as persisted, without freshness or checksum checks.
    pub async fn entry(&self, id: &str) -> Option<ValidatedCacheEntry> {
        self.load().await.remove(id)
    }

    async fn load(&self) -> Store {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Store::new(),
            Err(e) => {
                tracing::warn!("Failed to read cache {}: {}", self.path.display(), e);
                return Store::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Cache file {} is corrupt, ignoring: {}", self.path.display(), e);
            Store::new()
        })
    }

    async fn save(&self, store: &Store) -> io::Result<()> {
        let json = serde_json::to_string_pretty(store)?;
        tokio::fs::write(&self.path, json).await
    }
}
