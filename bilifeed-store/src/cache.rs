//! Feed cache.
//!
//! One JSON file per query fingerprint, holding the posts collected under
//! that query and the time they were written. Entries are replaced
//! wholesale on every save and never merged.
//!
//! ```json
//! {"created_ts": 1700000000, "items": [ ... ]}
//! ```

use bilifeed_core::{PostRecord, QueryShape};
use ring::digest::{SHA256, digest};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_cache_dir, load_json, save_json};

// ============================================================================
// Fingerprint
// ============================================================================

/// Hashes every field of the query shape into a hex SHA-256 digest.
///
/// The field order is fixed, so equal shapes always map to the same key.
/// Auth material is included: two sessions never share an entry.
pub fn compute_fingerprint(shape: &QueryShape) -> String {
    let pages = if shape.pages == 0 {
        String::new()
    } else {
        shape.pages.to_string()
    };
    let raw = [
        shape.feed_type.as_str(),
        shape.query_mode.as_str(),
        shape.target_up_mids.as_str(),
        pages.as_str(),
        shape.endpoint.as_str(),
        shape.features.as_str(),
        shape.web_location.as_str(),
        shape.sessdata.as_str(),
        shape.cookie.as_str(),
    ]
    .join("|");

    hex::encode(digest(&SHA256, raw.as_bytes()))
}

// ============================================================================
// Cache Entry
// ============================================================================

/// On-disk cache document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheEntry {
    /// Write time in epoch seconds.
    pub created_ts: i64,
    /// Posts collected under the fingerprint.
    pub items: Vec<PostRecord>,
}

impl CacheEntry {
    /// Returns true if the entry is older than `ttl_minutes` at `now`.
    ///
    /// A TTL of zero or less never expires.
    pub fn is_expired(&self, ttl_minutes: i64, now: i64) -> bool {
        ttl_minutes > 0 && now - self.created_ts > ttl_minutes * 60
    }
}

// ============================================================================
// Cache Store
// ============================================================================

/// Directory of cache files keyed by fingerprint.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(default_cache_dir())
    }
}

impl CacheStore {
    /// Creates a store rooted at `dir`. Nothing is created until a save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `fingerprint`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] unless the fingerprint is a
    /// non-empty run of ASCII alphanumerics.
    pub fn path_for(&self, fingerprint: &str) -> Result<PathBuf, StoreError> {
        if fingerprint.is_empty() || !fingerprint.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StoreError::InvalidKey(fingerprint.to_string()));
        }
        Ok(self.dir.join(format!("{fingerprint}.json")))
    }

    /// Loads the posts stored under `fingerprint`.
    ///
    /// Returns an empty list when there is no entry, the entry cannot be
    /// read or parsed, or it is older than the TTL. Never fails.
    pub async fn load(&self, fingerprint: &str, ttl_minutes: i64) -> Vec<PostRecord> {
        self.load_at(fingerprint, ttl_minutes, now_ts()).await
    }

    /// [`CacheStore::load`] evaluated at an explicit time.
    pub async fn load_at(&self, fingerprint: &str, ttl_minutes: i64, now: i64) -> Vec<PostRecord> {
        let Ok(path) = self.path_for(fingerprint) else {
            return Vec::new();
        };
        if !path.exists() {
            debug!(fingerprint, "Cache miss");
            return Vec::new();
        }

        let entry: CacheEntry = match load_json(&path).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable cache entry");
                return Vec::new();
            }
        };

        if entry.is_expired(ttl_minutes, now) {
            debug!(fingerprint, age_secs = now - entry.created_ts, "Cache entry expired");
            return Vec::new();
        }

        info!(fingerprint, items = entry.items.len(), "Cache hit");
        entry.items
    }

    /// Replaces the entry for `fingerprint` with `posts`, stamped now.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, fingerprint: &str, posts: &[PostRecord]) -> Result<(), StoreError> {
        self.save_at(fingerprint, posts, now_ts()).await
    }

    /// [`CacheStore::save`] with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save_at(
        &self,
        fingerprint: &str,
        posts: &[PostRecord],
        created_ts: i64,
    ) -> Result<(), StoreError> {
        let path = self.path_for(fingerprint)?;
        let entry = CacheEntry {
            created_ts,
            items: posts.to_vec(),
        };
        save_json(&path, &entry).await?;
        info!(fingerprint, items = posts.len(), "Cache saved");
        Ok(())
    }
}

fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilifeed_core::{FeedType, QueryMode};
    use tempfile::TempDir;

    fn shape() -> QueryShape {
        QueryShape {
            feed_type: FeedType::All,
            query_mode: QueryMode::All,
            target_up_mids: String::new(),
            pages: 5,
            endpoint: "https://api.bilibili.com/x/polymer/web-dynamic/v1/feed/all".to_string(),
            features: "itemOpusStyle".to_string(),
            web_location: "333.1365".to_string(),
            sessdata: "abc".to_string(),
            cookie: String::new(),
        }
    }

    fn posts() -> Vec<PostRecord> {
        vec![
            PostRecord {
                id: "1".to_string(),
                title: "first".to_string(),
                published_at: 100,
                ..Default::default()
            },
            PostRecord {
                id: "2".to_string(),
                media: vec!["m".to_string()],
                reshared_from: Some(Box::new(PostRecord {
                    id: "0".to_string(),
                    ..Default::default()
                })),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = compute_fingerprint(&shape());
        assert_eq!(a, compute_fingerprint(&shape()));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_covers_every_field() {
        let base = compute_fingerprint(&shape());
        let variants = [
            QueryShape { feed_type: FeedType::Video, ..shape() },
            QueryShape { query_mode: QueryMode::SelectedUp, ..shape() },
            QueryShape { target_up_mids: "1".to_string(), ..shape() },
            QueryShape { pages: 6, ..shape() },
            QueryShape { endpoint: "x".to_string(), ..shape() },
            QueryShape { features: "x".to_string(), ..shape() },
            QueryShape { web_location: "x".to_string(), ..shape() },
            QueryShape { sessdata: "other".to_string(), ..shape() },
            QueryShape { cookie: "a=b".to_string(), ..shape() },
        ];
        for variant in &variants {
            assert_ne!(compute_fingerprint(variant), base, "{variant:?}");
        }
    }

    #[tokio::test]
    async fn test_roundtrip_within_ttl() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let key = compute_fingerprint(&shape());

        store.save(&key, &posts()).await.unwrap();
        assert_eq!(store.load(&key, 60).await, posts());
    }

    #[tokio::test]
    async fn test_ttl_boundary() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let key = compute_fingerprint(&shape());
        let t = 1_700_000_000;

        store.save_at(&key, &posts(), t).await.unwrap();

        assert_eq!(store.load_at(&key, 10, t + 600 - 1).await, posts());
        assert_eq!(store.load_at(&key, 10, t + 600).await, posts());
        assert!(store.load_at(&key, 10, t + 600 + 1).await.is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_ttl_never_expires() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        let key = compute_fingerprint(&shape());

        store.save_at(&key, &posts(), 0).await.unwrap();
        assert_eq!(store.load_at(&key, 0, 10_000_000_000).await.len(), 2);
        assert_eq!(store.load_at(&key, -5, 10_000_000_000).await.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_entries() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path().join("not-yet"));
        assert!(store.load("deadbeef", 60).await.is_empty());

        let store = CacheStore::new(dir.path());
        std::fs::write(dir.path().join("deadbeef.json"), "{ truncated").unwrap();
        assert!(store.load("deadbeef", 60).await.is_empty());

        std::fs::write(dir.path().join("cafe.json"), r#"{"items": [{"id": "9"}]}"#).unwrap();
        let loaded = store.load_at("cafe", 0, 5).await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "9");
    }

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());

        store.save("k1", &posts()).await.unwrap();
        store.save("k1", &posts()[..1]).await.unwrap();
        assert_eq!(store.load("k1", 60).await.len(), 1);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let store = CacheStore::new("/tmp");
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("").is_err());
        assert!(store.path_for("abc123").is_ok());
    }
}
