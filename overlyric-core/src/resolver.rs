use crate::cache::LyricsCache;
use crate::error::CoreError;
use crate::normalize;
use crate::provider::{LyricsProvider, LyricsResult, LyricsSource};
use crate::providers::{GeniusProvider, LrclibProvider, PlaceholderProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "overlyric::resolver";

/// Resolves lyrics for a track through the cache and an ordered provider
/// chain. Providers are consulted in order; a provider error only advances
/// the chain and is never retried.
pub struct LyricsResolver {
    providers: Vec<Box<dyn LyricsProvider>>,
    cache: Arc<LyricsCache>,
}

impl LyricsResolver {
    /// Build the default chain: LRCLIB first (often synced), Genius when a
    /// token is configured, then the placeholder so resolution always
    /// produces something to display.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider's HTTP client cannot be created.
    pub fn new(cache: Arc<LyricsCache>, genius_token: Option<&str>) -> Result<Self, CoreError> {
        let mut providers: Vec<Box<dyn LyricsProvider>> = vec![Box::new(LrclibProvider::new()?)];
        if let Some(token) = genius_token.filter(|t| !t.is_empty()) {
            providers.push(Box::new(GeniusProvider::new(token)?));
        }
        providers.push(Box::new(PlaceholderProvider::new()));
        Ok(Self { providers, cache })
    }

    /// Build a resolver over an explicit provider chain.
    #[must_use]
    pub fn with_providers(
        cache: Arc<LyricsCache>,
        providers: Vec<Box<dyn LyricsProvider>>,
    ) -> Self {
        Self { providers, cache }
    }

    /// Append a provider to the end of the chain.
    pub fn add_provider(&mut self, provider: Box<dyn LyricsProvider>) {
        self.providers.push(provider);
    }

    /// Resolve lyrics for a track, checking the cache before the chain.
    ///
    /// A cached placeholder is never accepted as a final answer; hitting one
    /// falls through to a fresh fetch. A normalized-key hit is copied back
    /// under the track ID so the next lookup for the same track is direct.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::LyricsNotFound` when every provider in the chain
    /// has been exhausted.
    pub async fn get_lyrics(
        &self,
        track_id: &str,
        artist: &str,
        title: &str,
    ) -> Result<LyricsResult, CoreError> {
        if let Some(cached) = self.cache.get_by_track_id(track_id).await {
            if cached.source == LyricsSource::Placeholder {
                debug!(target: LOG_TARGET, "Cached placeholder for {artist} - {title}, refetching");
            } else {
                return Ok(cached);
            }
        }

        let normalized_key = normalize::normalize_key(artist, title);
        if let Some(cached) = self.cache.get_by_key(&normalized_key).await {
            if cached.source == LyricsSource::Placeholder {
                debug!(target: LOG_TARGET, "Cached placeholder under key for {artist} - {title}, refetching");
            } else {
                // Same song under a different track ID; warm the direct slot
                let mut lyrics = cached;
                lyrics.track_id = track_id.to_string();
                self.cache.set_by_track_id(track_id, lyrics.clone()).await;
                return Ok(lyrics);
            }
        }

        for provider in &self.providers {
            info!(
                target: LOG_TARGET,
                "Trying provider {} for {artist} - {title}",
                provider.name()
            );
            let mut lyrics = match provider.search_lyrics(artist, title).await {
                Ok(lyrics) => lyrics,
                Err(e) => {
                    warn!(target: LOG_TARGET, "Provider {} error: {e}", provider.name());
                    continue;
                }
            };
            if lyrics.is_empty() {
                continue;
            }

            lyrics.track_id = track_id.to_string();
            if lyrics.source == LyricsSource::Placeholder {
                debug!(target: LOG_TARGET, "Not caching placeholder result for {artist} - {title}");
            } else {
                self.cache
                    .set_both(track_id, &normalized_key, &lyrics)
                    .await;
            }
            return Ok(lyrics);
        }

        Err(CoreError::LyricsNotFound {
            track: title.to_string(),
            artist: artist.to_string(),
        })
    }

    /// Shared handle to the underlying cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<LyricsCache> {
        &self.cache
    }
}
