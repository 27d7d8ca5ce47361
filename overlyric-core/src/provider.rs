use crate::error::CoreError;
use crate::lrc::LyricLine;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a lyrics result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LyricsSource {
    /// Timed-lyrics database (LRCLIB)
    Lrclib,
    /// Scraped lyrics page (Genius)
    Genius,
    /// Synthesized track-info fallback; never cached as a final answer
    Placeholder,
}

impl LyricsSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lrclib => "lrclib",
            Self::Genius => "genius",
            Self::Placeholder => "placeholder",
        }
    }
}

/// Resolved lyrics for one track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsResult {
    /// Source track ID, stamped by the resolution service
    pub track_id: String,
    pub source: LyricsSource,
    pub lines: Vec<LyricLine>,
    pub is_synced: bool,
    pub fetched_at: DateTime<Utc>,
}

impl LyricsResult {
    /// Create a result with no track ID stamped yet.
    #[must_use]
    pub fn new(source: LyricsSource, lines: Vec<LyricLine>, is_synced: bool) -> Self {
        Self {
            track_id: String::new(),
            source,
            lines,
            is_synced,
            fetched_at: Utc::now(),
        }
    }

    /// Whether this result carries any lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Trait for lyrics providers
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Search for lyrics by artist and title.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::LyricsNotFound` when the provider has no match,
    /// or `CoreError::ProviderFailed`/`CoreError::NetworkError` on transport
    /// and parse failures. The resolution service treats any error as a
    /// signal to advance to the next provider.
    async fn search_lyrics(&self, artist: &str, title: &str) -> Result<LyricsResult, CoreError>;
}
