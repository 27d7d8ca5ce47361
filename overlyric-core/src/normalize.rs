//! Artist/title canonicalization and scraped-lyrics noise filtering.

use crate::lrc::LyricLine;
use once_cell::sync::Lazy;
use regex::Regex;

/// Qualifier patterns stripped from artist/title strings before matching.
/// Applied in order against lowercased input.
#[allow(clippy::unwrap_used)]
static QUALIFIER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\s*\(feat\..*?\)",
        r"\s*\(ft\..*?\)",
        r"\s*\(featuring.*?\)",
        r"\s*\[.*?\]",
        r"\s*\(.*?remix.*?\)",
        r"\s*\(.*?version.*?\)",
        r"\s*\(.*?edit.*?\)",
        r"\s*-\s*remaster.*",
        r"\s*-\s*remix.*",
        r"\s*-\s*radio edit.*",
        r"\s*-\s*.*?\bedit\b.*",
        r"\s*-\s*.*?\bversion\b.*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

#[allow(clippy::unwrap_used)]
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

#[allow(clippy::unwrap_used)]
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[allow(clippy::unwrap_used)]
static EMBED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s*embed$").unwrap());

/// Canonicalize a single artist or title string for matching.
///
/// Lowercases, strips featured-artist/remix/version/edit qualifiers and any
/// bracketed groups, removes remaining punctuation and collapses whitespace.
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut text = text.to_lowercase();
    for re in QUALIFIER_RES.iter() {
        text = re.replace_all(&text, "").into_owned();
    }
    let text = NON_WORD_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Build the normalized `artist|title` cache key.
#[must_use]
pub fn normalize_key(artist: &str, title: &str) -> String {
    format!("{}|{}", normalize(artist), normalize(title))
}

/// Language names listed under lyrics-site translation cross-links.
/// A line of 1-3 tokens that are all in this set is navigation, not lyrics.
const LANGUAGE_TOKENS: [&str; 32] = [
    "cesky",
    "čeština",
    "deutsch",
    "français",
    "francais",
    "español",
    "espanol",
    "português",
    "portugues",
    "italiano",
    "polski",
    "nederlands",
    "svenska",
    "suomi",
    "dansk",
    "norsk",
    "русский",
    "bahasa",
    "indonesia",
    "tiếng",
    "việt",
    "türkçe",
    "turkce",
    "العربية",
    "hebrew",
    "עברית",
    "日本語",
    "한국어",
    "中文",
    "简体中文",
    "繁體中文",
    "ไทย",
];

/// Check whether a non-empty scraped line is page boilerplate rather than a
/// lyric.
fn is_noise(line: &str) -> bool {
    let t = line.trim().to_lowercase();
    if t.is_empty() {
        return false; // blanks are spacers, handled by the caller
    }
    if t.contains("you might also like")
        || t.contains("genius annotation")
        || t.starts_with("see ")
        || t.contains("contributors")
        || t.contains("translation")
    {
        return true;
    }
    if EMBED_RE.is_match(&t) {
        return true;
    }

    // Standalone language-name lists under "Translations"
    let tokens: Vec<&str> = t.split_whitespace().collect();
    if !tokens.is_empty() && tokens.len() <= 3 {
        return tokens
            .iter()
            .all(|tok| LANGUAGE_TOKENS.contains(tok));
    }

    false
}

/// Convert raw scraped/plain lyrics text into display lines.
///
/// Boilerplate lines are dropped, runs of blank lines collapse to a single
/// spacer, and leading/trailing spacers are trimmed.
#[must_use]
pub fn plain_text_to_lines(text: &str) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = Vec::new();
    let mut last_was_empty = false;

    for raw in text.lines() {
        let t = raw.trim();
        if is_noise(t) {
            continue;
        }
        if t.is_empty() {
            if last_was_empty {
                continue;
            }
            lines.push(LyricLine::plain(""));
            last_was_empty = true;
            continue;
        }
        lines.push(LyricLine::plain(t));
        last_was_empty = false;
    }

    while lines.first().is_some_and(|l| l.text.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.text.is_empty()) {
        lines.pop();
    }

    lines
}
