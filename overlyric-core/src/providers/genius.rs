use crate::error::CoreError;
use crate::normalize;
use crate::provider::{LyricsProvider, LyricsResult, LyricsSource};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use select::document::Document;
use select::predicate::Attr;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const LOG_TARGET: &str = "overlyric::provider::genius";
const GENIUS_API_URL: &str = "https://api.genius.com";

/// Genius pages are heavier than the LRCLIB API, allow more time.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Song pages refuse non-browser clients, so page fetches masquerade as one.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

#[allow(clippy::unwrap_used)]
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
#[allow(clippy::unwrap_used)]
static EXCESS_NEWLINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Genius lyrics provider. Searches via the API, then scrapes the song page
/// since the API itself never returns lyrics text. Results are always
/// unsynced.
pub struct GeniusProvider {
    token: String,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: SongResult,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SongResult {
    id: i64,
    title: String,
    url: String,
}

impl GeniusProvider {
    /// Create a new Genius provider with the given API token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(token: impl Into<String>) -> Result<Self, CoreError> {
        Self::with_base_url(token, GENIUS_API_URL)
    }

    /// Create a provider pointed at an alternate API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            token: token.into(),
            client,
            base_url: base_url.into(),
        })
    }

    async fn search_song(&self, query: &str) -> Result<Option<SongResult>, CoreError> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(query));
        debug!(target: LOG_TARGET, "Genius search URL: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "Overlyric/1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CoreError::ProviderFailed {
                provider: "genius".to_string(),
                reason: format!("Genius API returned status: {}", response.status()),
            });
        }

        let mut parsed: SearchResponse = response.json().await?;
        if parsed.response.hits.is_empty() {
            return Ok(None);
        }
        Ok(Some(parsed.response.hits.remove(0).result))
    }

    async fn fetch_page(&self, page_url: &str) -> Result<String, CoreError> {
        let response = self
            .client
            .get(page_url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CoreError::ProviderFailed {
                provider: "genius".to_string(),
                reason: format!("Genius page returned status: {}", response.status()),
            });
        }

        Ok(response.text().await?)
    }

    /// Extract the lyrics text from a Genius song page. Containers marked
    /// `data-lyrics-container` are preferred, keeping only English or
    /// language-unspecified blocks; older page layouts fall back to
    /// `Lyrics__Container` classes with translation and footer blocks
    /// filtered out.
    fn extract_lyrics_text(html: &str) -> Option<String> {
        let doc = Document::from(html);

        let mut blocks: Vec<String> = doc
            .find(Attr("data-lyrics-container", ()))
            .filter(|node| {
                matches!(node.attr("data-lyrics-container"), Some("true" | ""))
            })
            .filter(|node| match node.attr("data-lyrics-language") {
                None => true,
                Some(lang) => lang.to_lowercase().starts_with("en"),
            })
            .map(|node| Self::node_to_text(&node.inner_html()))
            .collect();

        if blocks.is_empty() {
            blocks = doc
                .find(Attr("class", ()))
                .filter(|node| {
                    node.attr("class").is_some_and(|class| {
                        let lower = class.to_lowercase();
                        class.contains("Lyrics__Container")
                            && !lower.contains("translation")
                            && !lower.contains("contributor")
                            && !lower.contains("footer")
                    })
                })
                .map(|node| Self::node_to_text(&node.inner_html()))
                .collect();
        }

        if blocks.is_empty() {
            return None;
        }

        let text = blocks.join("\n");
        let text = EXCESS_NEWLINES_RE.replace_all(&text, "\n\n");
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Flatten a container's inner HTML to plain text, keeping line breaks
    /// from `<br>` and block elements.
    fn node_to_text(inner_html: &str) -> String {
        let with_newlines = inner_html
            .replace("<br/>", "\n")
            .replace("<br>", "\n")
            .replace("<br />", "\n")
            .replace("</p>", "\n")
            .replace("</div>", "\n");
        let stripped = HTML_TAG_RE.replace_all(&with_newlines, "");
        decode_html_entities(&stripped)
    }
}

fn decode_html_entities(s: &str) -> String {
    s.replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[async_trait]
impl LyricsProvider for GeniusProvider {
    fn name(&self) -> &'static str {
        "genius"
    }

    async fn search_lyrics(&self, artist: &str, title: &str) -> Result<LyricsResult, CoreError> {
        info!(
            target: LOG_TARGET,
            "Fetching lyrics from Genius for: {artist} - {title}"
        );

        let query = format!("{artist} {title}");
        let song = self
            .search_song(&query)
            .await?
            .ok_or_else(|| CoreError::LyricsNotFound {
                track: title.to_string(),
                artist: artist.to_string(),
            })?;

        info!(target: LOG_TARGET, "Genius scraping {}", song.url);
        let html = self.fetch_page(&song.url).await?;

        let text = Self::extract_lyrics_text(&html).ok_or_else(|| CoreError::ProviderFailed {
            provider: "genius".to_string(),
            reason: "could not locate lyrics container".to_string(),
        })?;

        let lines = normalize::plain_text_to_lines(&text);
        if lines.is_empty() {
            return Err(CoreError::ProviderFailed {
                provider: "genius".to_string(),
                reason: "no usable lyrics lines parsed".to_string(),
            });
        }

        Ok(LyricsResult::new(LyricsSource::Genius, lines, false))
    }
}
