//! Parser for LRC (timed lyrics) text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single line of lyrics.
///
/// `timestamp_ms` is `None` for plain (untimed) lines; for timed lines it is
/// the playback offset at which the line becomes current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    pub text: String,
    #[serde(rename = "timestamp_ms", skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

impl LyricLine {
    /// Create a timed line.
    pub fn timed(text: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            text: text.into(),
            timestamp_ms: Some(timestamp_ms),
        }
    }

    /// Create a plain (untimed) line.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp_ms: None,
        }
    }
}

/// Timestamp tag: `[mm:ss]`, `[mm:ss.t]`, `[mm:ss.tt]` or `[mm:ss.ttt]`
#[allow(clippy::unwrap_used)]
static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d{1,2}):(\d{1,2})(?:\.(\d{1,3}))?\]").unwrap());

/// Metadata tag prefixes that are discarded entirely.
const METADATA_PREFIXES: [&str; 5] = ["[ti:", "[ar:", "[al:", "[by:", "[offset:"];

/// Parse LRC text into timed lyric lines.
///
/// - A line carrying multiple timestamp tags produces one `LyricLine` per
///   tag, all sharing the text after the last tag.
/// - Metadata tag lines (`[ti:`, `[ar:`, ...) and lines without any
///   timestamp are dropped.
/// - Output is sorted ascending by timestamp; ties keep input order.
#[must_use]
pub fn parse_synced_lyrics(input: &str) -> Vec<LyricLine> {
    let mut lines = Vec::new();

    for raw in input.lines() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        if METADATA_PREFIXES.iter().any(|p| raw.starts_with(p)) {
            continue;
        }

        let matches: Vec<_> = TIMESTAMP_RE.captures_iter(raw).collect();
        let Some(last) = matches.last() else {
            continue;
        };

        // Text is everything after the last timestamp tag
        let text_start = last.get(0).map_or(raw.len(), |m| m.end());
        let text = raw[text_start..].trim();
        if text.is_empty() {
            continue;
        }

        for caps in &matches {
            let minutes = extract_digits(caps.get(1).map_or("", |m| m.as_str()));
            let seconds = extract_digits(caps.get(2).map_or("", |m| m.as_str()));
            let millis = caps.get(3).map_or(0, |m| fraction_to_millis(m.as_str()));
            let timestamp = minutes * 60_000 + seconds * 1000 + millis;
            lines.push(LyricLine::timed(text, timestamp));
        }
    }

    // Stable sort keeps relative input order for equal timestamps
    lines.sort_by_key(|l| l.timestamp_ms);
    lines
}

/// Scale a fractional-seconds field to milliseconds: one digit is tenths of
/// a second, two digits hundredths, three digits exact milliseconds.
fn fraction_to_millis(fraction: &str) -> u64 {
    let value = extract_digits(fraction);
    match fraction.len() {
        1 => value * 100,
        2 => value * 10,
        _ => value,
    }
}

/// Digit extraction that skips any stray non-digit characters instead of
/// failing the parse.
fn extract_digits(s: &str) -> u64 {
    s.bytes()
        .filter(u8::is_ascii_digit)
        .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
}

/// Format a millisecond offset as an LRC timestamp (mm:ss.xx)
#[must_use]
pub fn format_timestamp_ms(timestamp_ms: u64) -> String {
    let total_secs = timestamp_ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let hundredths = (timestamp_ms % 1000) / 10;
    format!("{minutes:02}:{seconds:02}.{hundredths:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_lines() {
        let input = "[00:12.34]First line\n[00:15.67]Second line\n[00:20.00]Third line";
        let lines = parse_synced_lyrics(input);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], LyricLine::timed("First line", 12_340));
        assert_eq!(lines[1], LyricLine::timed("Second line", 15_670));
        assert_eq!(lines[2], LyricLine::timed("Third line", 20_000));
    }

    #[test]
    fn test_metadata_tags_skipped() {
        let input = "[ti:Test Song]\n[ar:Test Artist]\n[00:10.00]First line\n[00:15.50]Second line\n[by:Test Author]";
        let lines = parse_synced_lyrics(input);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "First line");
        assert_eq!(lines[0].timestamp_ms, Some(10_000));
        assert_eq!(lines[1].timestamp_ms, Some(15_500));
    }

    #[test]
    fn test_multi_timestamp_line() {
        let input = "[00:10.00][00:12.00]Line with multiple timestamps";
        let lines = parse_synced_lyrics(input);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].timestamp_ms, Some(10_000));
        assert_eq!(lines[1].timestamp_ms, Some(12_000));
        assert_eq!(lines[0].text, "Line with multiple timestamps");
        assert_eq!(lines[1].text, "Line with multiple timestamps");
    }

    #[test]
    fn test_out_of_order_input_sorted() {
        let input = "[00:20.00]Third line\n[00:10.00]First line\n[00:15.00]Second line";
        let lines = parse_synced_lyrics(input);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].timestamp_ms, Some(10_000));
        assert_eq!(lines[1].timestamp_ms, Some(15_000));
        assert_eq!(lines[2].timestamp_ms, Some(20_000));
        assert_eq!(lines[0].text, "First line");
    }

    #[test]
    fn test_untimed_lines_dropped() {
        let input = "No timestamp here\n[00:05.00]Timed line\nAnother plain line";
        let lines = parse_synced_lyrics(input);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Timed line");
    }

    #[test]
    fn test_fraction_precision() {
        // One digit is tenths, two digits hundredths, three digits exact
        assert_eq!(
            parse_synced_lyrics("[00:01.5]a")[0].timestamp_ms,
            Some(1500)
        );
        assert_eq!(
            parse_synced_lyrics("[00:01.50]a")[0].timestamp_ms,
            Some(1500)
        );
        assert_eq!(
            parse_synced_lyrics("[00:01.500]a")[0].timestamp_ms,
            Some(1500)
        );
        assert_eq!(
            parse_synced_lyrics("[00:01.005]a")[0].timestamp_ms,
            Some(1005)
        );
    }

    #[test]
    fn test_no_fraction() {
        let lines = parse_synced_lyrics("[01:30]Minute and a half");
        assert_eq!(lines[0].timestamp_ms, Some(90_000));
    }

    #[test]
    fn test_empty_text_after_tags_dropped() {
        let lines = parse_synced_lyrics("[00:10.00]\n[00:12.00]Real line");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Real line");
    }

    #[test]
    fn test_cjk_text() {
        let lines = parse_synced_lyrics("[00:05.00]你好世界");
        assert_eq!(lines[0].text, "你好世界");
    }

    #[test]
    fn test_extract_digits_skips_noise() {
        assert_eq!(extract_digits("1a2"), 12);
        assert_eq!(extract_digits(""), 0);
        assert_eq!(extract_digits("07"), 7);
    }

    #[test]
    fn test_format_timestamp_ms() {
        assert_eq!(format_timestamp_ms(12_340), "00:12.34");
        assert_eq!(format_timestamp_ms(90_000), "01:30.00");
        assert_eq!(format_timestamp_ms(0), "00:00.00");
    }
}
