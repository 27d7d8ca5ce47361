use crate::error::CoreError;
use crate::lrc::LyricLine;
use crate::provider::{LyricsProvider, LyricsResult, LyricsSource};
use async_trait::async_trait;

/// Last-resort provider that synthesizes a track-info card so the overlay
/// never goes blank. Always succeeds; the resolution service knows never to
/// cache its output.
pub struct PlaceholderProvider;

impl PlaceholderProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PlaceholderProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LyricsProvider for PlaceholderProvider {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn search_lyrics(&self, artist: &str, title: &str) -> Result<LyricsResult, CoreError> {
        // Timestamps pace the card during playback; the result is still
        // reported as unsynced since these are not real lyric timings.
        let lines = vec![
            LyricLine::timed(format!("\u{1f3b5} {title}"), 0),
            LyricLine::timed(format!("by {artist}"), 2_000),
            LyricLine::timed(String::new(), 4_000),
            LyricLine::timed("\u{266a} Now playing \u{266a}".to_string(), 6_000),
        ];
        Ok(LyricsResult::new(LyricsSource::Placeholder, lines, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_returns_a_card() {
        let provider = PlaceholderProvider::new();
        let result = provider.search_lyrics("Artist", "Song").await.unwrap();

        assert_eq!(result.source, LyricsSource::Placeholder);
        assert!(!result.is_synced);
        assert_eq!(result.lines.len(), 4);
        assert_eq!(result.lines[0].text, "\u{1f3b5} Song");
        assert_eq!(result.lines[1].text, "by Artist");
        assert_eq!(result.lines[3].timestamp_ms, Some(6_000));
    }
}
