use crate::models::NormalizedRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Cached lookup result with an integrity checksum.
///
/// The cache file is plain JSON that anyone can open and edit, so each entry
/// carries a SHA-256 of its serialized `data`. An entry that no longer matches
/// its checksum is ignored and the identifier is fetched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedCacheEntry {
    /// When the record was fetched from the provider.
    pub fetched_at: DateTime<Utc>,
    /// Normalized record, or `None` for a cached negative lookup.
    pub data: Option<NormalizedRecord>,
    /// SHA-256 of the JSON-serialized `data` (hex encoded).
    pub checksum: String,
}

impl ValidatedCacheEntry {
    /// Creates an entry with its checksum computed.
    pub fn new(data: Option<NormalizedRecord>, fetched_at: DateTime<Utc>) -> Self {
        let checksum = Self::compute_checksum(&data);
        Self {
            fetched_at,
            data,
            checksum,
        }
    }

    fn compute_checksum(data: &Option<NormalizedRecord>) -> String {
        let serialized = serde_json::to_string(data).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(serialized.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Returns true if the checksum matches, false if tampered.
    pub fn is_valid(&self) -> bool {
        Self::compute_checksum(&self.data) == self.checksum
    }

    /// Age check against `now`; an entry exactly `ttl` old is already stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}
