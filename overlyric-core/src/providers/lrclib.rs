use crate::error::CoreError;
use crate::lrc;
use crate::normalize;
use crate::provider::{LyricsProvider, LyricsResult, LyricsSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "overlyric::provider::lrclib";
const LRCLIB_API_URL: &str = "https://lrclib.net/api";
const USER_AGENT: &str = "Overlyric/1.0 (https://github.com/overlyric/overlyric)";

/// Default timeout for HTTP requests (10 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// LRCLIB.net lyrics provider. Returns synced lyrics when the database has
/// them, plain lyrics otherwise.
pub struct LrclibProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct LrclibTrack {
    id: i64,
    #[serde(rename = "trackName", default)]
    track_name: String,
    #[serde(rename = "artistName", default)]
    artist_name: String,
    #[serde(rename = "albumName", default)]
    album_name: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(rename = "plainLyrics", default)]
    plain_lyrics: Option<String>,
    #[serde(rename = "syncedLyrics", default)]
    synced_lyrics: Option<String>,
}

impl LrclibTrack {
    fn has_lyrics(&self) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.synced_lyrics) || filled(&self.plain_lyrics)
    }
}

impl LrclibProvider {
    /// Create a new LRCLIB provider with a 10-second request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, CoreError> {
        Self::with_base_url(LRCLIB_API_URL)
    }

    /// Create a provider pointed at an alternate API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Probe the exact-match endpoint. Any failure here just means we fall
    /// through to search, so errors are logged and discarded.
    async fn try_get(&self, artist: &str, title: &str) -> Option<LrclibTrack> {
        let url = format!(
            "{}/get?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(title),
            urlencoding::encode(artist)
        );
        debug!(target: LOG_TARGET, "LRCLIB request URL (exact): {}", url);

        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let track: LrclibTrack = response.json().await.ok()?;
        track.has_lyrics().then_some(track)
    }

    async fn search(&self, artist: &str, title: &str) -> Result<Vec<LrclibTrack>, CoreError> {
        let url = format!(
            "{}/search?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(title),
            urlencoding::encode(artist)
        );
        self.fetch_results(&url).await
    }

    async fn search_by_query(&self, query: &str) -> Result<Vec<LrclibTrack>, CoreError> {
        let url = format!(
            "{}/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        self.fetch_results(&url).await
    }

    async fn fetch_results(&self, url: &str) -> Result<Vec<LrclibTrack>, CoreError> {
        debug!(target: LOG_TARGET, "LRCLIB request URL (search): {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(CoreError::ProviderFailed {
                provider: "lrclib".to_string(),
                reason: format!("LRCLIB search returned status: {}", response.status()),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch the full record for a search hit. Search results often omit the
    /// lyrics bodies, so the winner is re-fetched by ID; the query-param form
    /// is tried when the path form fails.
    async fn get_by_id(&self, id: i64) -> Option<LrclibTrack> {
        let url = format!("{}/get/{}", self.base_url, id);
        if let Ok(response) = self.client.get(&url).send().await {
            if response.status().is_success() {
                if let Ok(track) = response.json::<LrclibTrack>().await {
                    return Some(track);
                }
            }
        }

        let url = format!("{}/get?id={}", self.base_url, id);
        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            debug!(target: LOG_TARGET, "LRCLIB get by id {} returned status: {}", id, response.status());
            return None;
        }
        response.json().await.ok()
    }

    /// Score search results against the requested artist/title. Exact
    /// normalized matches dominate, synced lyrics beat plain, and ties keep
    /// the first-seen result.
    fn pick_best_match(results: &[LrclibTrack], artist: &str, title: &str) -> Option<usize> {
        let want_artist = normalize::normalize(artist);
        let want_title = normalize::normalize(title);

        let mut best: Option<(usize, i32)> = None;
        for (idx, track) in results.iter().enumerate() {
            let mut score = 0;
            if normalize::normalize(&track.artist_name) == want_artist {
                score += 3;
            }
            if normalize::normalize(&track.track_name) == want_title {
                score += 3;
            }
            if track.synced_lyrics.as_deref().is_some_and(|s| !s.is_empty()) {
                score += 2;
            }
            if track.plain_lyrics.as_deref().is_some_and(|s| !s.is_empty()) {
                score += 1;
            }
            let improves = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if improves {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn track_to_result(track: &LrclibTrack) -> Option<LyricsResult> {
        if let Some(synced) = track.synced_lyrics.as_deref() {
            if !synced.trim().is_empty() {
                let lines = lrc::parse_synced_lyrics(synced);
                if !lines.is_empty() {
                    debug!(target: LOG_TARGET, "Got synced lyrics with {} lines (lrclib id: {})", lines.len(), track.id);
                    return Some(LyricsResult::new(LyricsSource::Lrclib, lines, true));
                }
            }
        }

        if let Some(plain) = track.plain_lyrics.as_deref() {
            if !plain.trim().is_empty() {
                let lines = normalize::plain_text_to_lines(plain);
                if !lines.is_empty() {
                    debug!(target: LOG_TARGET, "Got plain lyrics (lrclib id: {})", track.id);
                    return Some(LyricsResult::new(LyricsSource::Lrclib, lines, false));
                }
            }
        }

        None
    }
}

#[async_trait]
impl LyricsProvider for LrclibProvider {
    fn name(&self) -> &'static str {
        "lrclib"
    }

    async fn search_lyrics(&self, artist: &str, title: &str) -> Result<LyricsResult, CoreError> {
        info!(
            target: LOG_TARGET,
            "Fetching lyrics from LRCLIB for: {artist} - {title}"
        );

        if let Some(track) = self.try_get(artist, title).await {
            if let Some(result) = Self::track_to_result(&track) {
                return Ok(result);
            }
        }

        let mut results = self.search(artist, title).await?;
        if results.is_empty() {
            let query = format!("{title} {artist}");
            let query = query.trim();
            if !query.is_empty() {
                results = self.search_by_query(query).await?;
            }
        }
        if results.is_empty() {
            return Err(CoreError::LyricsNotFound {
                track: title.to_string(),
                artist: artist.to_string(),
            });
        }

        let best_idx = Self::pick_best_match(&results, artist, title).unwrap_or(0);
        let best = &results[best_idx];
        info!(target: LOG_TARGET, "LRCLIB best match id: {} ({})", best.id, best.track_name);

        if let Some(full) = self.get_by_id(best.id).await {
            if let Some(result) = Self::track_to_result(&full) {
                return Ok(result);
            }
        }

        // Search payloads sometimes carry the lyrics inline already
        Self::track_to_result(best).ok_or_else(|| {
            warn!(target: LOG_TARGET, "LRCLIB match {} carried no usable lyrics", best.id);
            CoreError::ProviderFailed {
                provider: "lrclib".to_string(),
                reason: "matched track carried no usable lyrics".to_string(),
            }
        })
    }
}
