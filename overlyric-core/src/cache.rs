use crate::provider::LyricsResult;
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::debug;

const LOG_TARGET: &str = "overlyric::cache";

/// Capacity used when a zero capacity is requested.
pub const DEFAULT_CAPACITY: usize = 100;

const DEFAULT_TTL_HOURS: i64 = 24;

/// A cache slot. Track-ID and normalized-key entries live in the same LRU
/// so recency ordering is shared, but the two key spaces never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    TrackId(String),
    Normalized(String),
}

struct CacheEntry {
    lyrics: LyricsResult,
    created_at: DateTime<Utc>,
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub track_entries: usize,
    pub key_entries: usize,
}

/// Dual-key LRU cache for resolved lyrics.
///
/// Entries expire `ttl` after insertion and are evicted lazily on read.
/// All operations take the single internal lock; callers must never hold
/// it across network fetches.
pub struct LyricsCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    max_size: usize,
    ttl: Duration,
}

impl LyricsCache {
    /// Create a cache with the default 24 hour TTL. A capacity of zero
    /// falls back to [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_ttl(capacity, Duration::hours(DEFAULT_TTL_HOURS))
    }

    /// Create a cache with an explicit TTL.
    #[must_use]
    pub fn with_ttl(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN));
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            max_size: capacity.get(),
            ttl,
        }
    }

    /// Look up lyrics by source track ID. Promotes the entry on hit.
    pub async fn get_by_track_id(&self, track_id: &str) -> Option<LyricsResult> {
        self.get(&CacheKey::TrackId(track_id.to_owned())).await
    }

    /// Look up lyrics by normalized artist|title key. Promotes the entry on hit.
    pub async fn get_by_key(&self, key: &str) -> Option<LyricsResult> {
        self.get(&CacheKey::Normalized(key.to_owned())).await
    }

    async fn get(&self, key: &CacheKey) -> Option<LyricsResult> {
        let mut entries = self.entries.lock().await;
        let stale = entries.peek(key).map(|entry| self.is_stale(entry));
        match stale {
            None => None,
            Some(true) => {
                debug!(target: LOG_TARGET, ?key, "evicting stale cache entry");
                entries.pop(key);
                None
            }
            Some(false) => entries.get(key).map(|entry| entry.lyrics.clone()),
        }
    }

    /// Store lyrics under a source track ID.
    pub async fn set_by_track_id(&self, track_id: &str, lyrics: LyricsResult) {
        let mut entries = self.entries.lock().await;
        Self::insert(&mut entries, CacheKey::TrackId(track_id.to_owned()), lyrics);
    }

    /// Store lyrics under a normalized artist|title key.
    pub async fn set_by_key(&self, key: &str, lyrics: LyricsResult) {
        let mut entries = self.entries.lock().await;
        Self::insert(&mut entries, CacheKey::Normalized(key.to_owned()), lyrics);
    }

    /// Store lyrics under both keys with a single lock acquisition, so a
    /// concurrent reader never observes one slot written without the other.
    pub async fn set_both(&self, track_id: &str, key: &str, lyrics: &LyricsResult) {
        let mut entries = self.entries.lock().await;
        Self::insert(
            &mut entries,
            CacheKey::TrackId(track_id.to_owned()),
            lyrics.clone(),
        );
        Self::insert(
            &mut entries,
            CacheKey::Normalized(key.to_owned()),
            lyrics.clone(),
        );
    }

    fn insert(entries: &mut LruCache<CacheKey, CacheEntry>, key: CacheKey, lyrics: LyricsResult) {
        entries.put(
            key,
            CacheEntry {
                lyrics,
                created_at: Utc::now(),
            },
        );
    }

    fn is_stale(&self, entry: &CacheEntry) -> bool {
        Utc::now().signed_duration_since(entry.created_at) > self.ttl
    }

    /// Drop all entries.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Current number of entries across both key spaces.
    pub async fn size(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Occupancy snapshot, counted per key space.
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().await;
        let track_entries = entries
            .iter()
            .filter(|(key, _)| matches!(key, CacheKey::TrackId(_)))
            .count();
        CacheStats {
            size: entries.len(),
            max_size: self.max_size,
            track_entries,
            key_entries: entries.len() - track_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lrc::LyricLine;
    use crate::provider::LyricsSource;

    fn lyrics(text: &str) -> LyricsResult {
        LyricsResult::new(
            LyricsSource::Lrclib,
            vec![LyricLine::timed(text.to_owned(), 0)],
            true,
        )
    }

    #[tokio::test]
    async fn set_and_get_by_track_id() {
        let cache = LyricsCache::new(10);
        cache.set_by_track_id("track1", lyrics("hello")).await;

        let got = cache.get_by_track_id("track1").await;
        assert!(got.is_some_and(|l| l.lines[0].text == "hello"));
        assert!(cache.get_by_track_id("missing").await.is_none());
    }

    #[tokio::test]
    async fn set_and_get_by_key() {
        let cache = LyricsCache::new(10);
        cache.set_by_key("artist|title", lyrics("hello")).await;

        assert!(cache.get_by_key("artist|title").await.is_some());
        assert!(cache.get_by_key("other|song").await.is_none());
    }

    #[tokio::test]
    async fn track_id_and_key_spaces_do_not_collide() {
        let cache = LyricsCache::new(10);
        cache.set_by_track_id("same", lyrics("by id")).await;
        cache.set_by_key("same", lyrics("by key")).await;

        let by_id = cache.get_by_track_id("same").await;
        let by_key = cache.get_by_key("same").await;
        assert!(by_id.is_some_and(|l| l.lines[0].text == "by id"));
        assert!(by_key.is_some_and(|l| l.lines[0].text == "by key"));
        assert_eq!(cache.size().await, 2);
    }

    #[tokio::test]
    async fn evicts_least_recently_used() {
        let cache = LyricsCache::new(2);
        cache.set_by_track_id("a", lyrics("a")).await;
        cache.set_by_track_id("b", lyrics("b")).await;
        cache.set_by_track_id("c", lyrics("c")).await;

        assert!(cache.get_by_track_id("a").await.is_none());
        assert!(cache.get_by_track_id("b").await.is_some());
        assert!(cache.get_by_track_id("c").await.is_some());
        assert_eq!(cache.size().await, 2);
    }

    #[tokio::test]
    async fn get_promotes_entry() {
        let cache = LyricsCache::new(2);
        cache.set_by_track_id("a", lyrics("a")).await;
        cache.set_by_track_id("b", lyrics("b")).await;
        // touching "a" makes "b" the eviction candidate
        assert!(cache.get_by_track_id("a").await.is_some());
        cache.set_by_track_id("c", lyrics("c")).await;

        assert!(cache.get_by_track_id("a").await.is_some());
        assert!(cache.get_by_track_id("b").await.is_none());
    }

    #[tokio::test]
    async fn update_in_place_does_not_grow() {
        let cache = LyricsCache::new(10);
        cache.set_by_track_id("a", lyrics("old")).await;
        cache.set_by_track_id("a", lyrics("new")).await;

        assert_eq!(cache.size().await, 1);
        let got = cache.get_by_track_id("a").await;
        assert!(got.is_some_and(|l| l.lines[0].text == "new"));
    }

    #[tokio::test]
    async fn set_both_writes_both_slots() {
        let cache = LyricsCache::new(10);
        cache.set_both("track1", "artist|title", &lyrics("hello")).await;

        assert!(cache.get_by_track_id("track1").await.is_some());
        assert!(cache.get_by_key("artist|title").await.is_some());
    }

    #[tokio::test]
    async fn zero_capacity_uses_default() {
        let cache = LyricsCache::new(0);
        let stats = cache.stats().await;
        assert_eq!(stats.max_size, DEFAULT_CAPACITY);
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let cache = LyricsCache::new(10);
        cache.set_by_track_id("a", lyrics("a")).await;
        cache.set_by_key("b|b", lyrics("b")).await;
        cache.clear().await;

        assert_eq!(cache.size().await, 0);
        assert!(cache.get_by_track_id("a").await.is_none());
    }

    #[tokio::test]
    async fn stats_counts_key_spaces() {
        let cache = LyricsCache::new(10);
        cache.set_by_track_id("a", lyrics("a")).await;
        cache.set_by_track_id("b", lyrics("b")).await;
        cache.set_by_key("a|a", lyrics("a")).await;

        let stats = cache.stats().await;
        assert_eq!(stats.size, 3);
        assert_eq!(stats.track_entries, 2);
        assert_eq!(stats.key_entries, 1);
        assert_eq!(stats.max_size, 10);
    }

    #[tokio::test]
    async fn expired_entries_are_evicted_on_read() {
        let cache = LyricsCache::with_ttl(10, Duration::zero());
        cache.set_by_track_id("a", lyrics("a")).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        assert!(cache.get_by_track_id("a").await.is_none());
        assert_eq!(cache.size().await, 0);
    }

    #[tokio::test]
    async fn fresh_entries_survive_ttl_check() {
        let cache = LyricsCache::with_ttl(10, Duration::hours(1));
        cache.set_by_track_id("a", lyrics("a")).await;

        assert!(cache.get_by_track_id("a").await.is_some());
    }
}
