use crate::playback::PlaybackSnapshot;
use crate::provider::LyricsResult;
use crate::time::{self, DurationExt};

/// Default display offset compensating for polling and render latency.
/// Positive values make lines appear earlier.
pub const DEFAULT_SYNC_OFFSET_MS: i64 = 350;

/// Line duration used when there is no next line to measure against.
const DEFAULT_LINE_DURATION_MS: u64 = 3_000;

const NO_TRACK_TEXT: &str = "No track playing";
const NO_LYRICS_TEXT: &str = "No lyrics available";
const INSTRUMENTAL_TEXT: &str = "\u{266a} Instrumental \u{266a}";

/// One render tick's worth of display state. "Nothing playing" and "no
/// lyrics" are valid frames with explanatory text, never errors; the UI
/// always has something to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    pub current_line: String,
    pub next_line: String,
    /// Timestamp of the current line
    pub line_start_ms: u64,
    /// Time until the next line takes over; drives highlight animation
    pub line_duration_ms: u64,
    /// Progress within the current line, clamped to its duration
    pub line_progress_ms: u64,
    pub is_playing: bool,
}

impl DisplayFrame {
    fn message(text: &str, is_playing: bool) -> Self {
        Self {
            current_line: text.to_string(),
            next_line: String::new(),
            line_start_ms: 0,
            line_duration_ms: 0,
            line_progress_ms: 0,
            is_playing,
        }
    }
}

/// Map playback position to the active lyric line and next-line preview.
///
/// Effective progress is the snapshot's interpolated position plus the
/// configured offset (falling back to [`DEFAULT_SYNC_OFFSET_MS`]). For
/// synced lyrics the current line is the last line whose timestamp has
/// passed; empty lines are spacers and are never shown as current.
/// Unsynced lyrics display statically, ignoring progress.
#[must_use]
pub fn get_display_frame(
    snapshot: Option<&PlaybackSnapshot>,
    lyrics: Option<&LyricsResult>,
    offset_ms: Option<i64>,
) -> DisplayFrame {
    let Some(snapshot) = snapshot else {
        return DisplayFrame::message(NO_TRACK_TEXT, false);
    };
    let Some(lyrics) = lyrics else {
        return DisplayFrame::message(NO_LYRICS_TEXT, snapshot.is_playing);
    };
    if lyrics.lines.is_empty() {
        return DisplayFrame::message(INSTRUMENTAL_TEXT, snapshot.is_playing);
    }

    if !lyrics.is_synced {
        return static_frame(lyrics, snapshot.is_playing);
    }

    let offset = offset_ms.unwrap_or(DEFAULT_SYNC_OFFSET_MS);
    let effective = time::apply_offset(snapshot.effective_progress(), offset).as_millis_u64();
    synced_frame(lyrics, effective, snapshot.is_playing)
}

/// Unsynced lyrics: first line as current, second as preview.
fn static_frame(lyrics: &LyricsResult, is_playing: bool) -> DisplayFrame {
    let next_line = lyrics
        .lines
        .get(1)
        .map(|line| line.text.clone())
        .unwrap_or_default();
    DisplayFrame {
        current_line: lyrics.lines[0].text.clone(),
        next_line,
        line_start_ms: 0,
        line_duration_ms: DEFAULT_LINE_DURATION_MS,
        line_progress_ms: 0,
        is_playing,
    }
}

fn synced_frame(lyrics: &LyricsResult, effective_ms: u64, is_playing: bool) -> DisplayFrame {
    let lines = &lyrics.lines;
    let line_time = |idx: usize| lines[idx].timestamp_ms.unwrap_or(0);

    // Last line whose timestamp has passed; lines are sorted ascending
    let started = lines
        .iter()
        .rposition(|line| line.timestamp_ms.unwrap_or(0) <= effective_ms);

    let Some(started_idx) = started else {
        return before_first_line_frame(lyrics, effective_ms, is_playing);
    };

    // Spacers are never the current line: scan forward to the next real
    // line, or back to the last one when only spacers remain at the end.
    let current_idx = lines[started_idx..]
        .iter()
        .position(|line| !line.text.is_empty())
        .map(|offset| started_idx + offset)
        .or_else(|| lines[..started_idx].iter().rposition(|line| !line.text.is_empty()));
    let Some(current_idx) = current_idx else {
        return DisplayFrame::message(INSTRUMENTAL_TEXT, is_playing);
    };

    let line_start_ms = line_time(current_idx);
    let next_idx = lines[current_idx + 1..]
        .iter()
        .position(|line| !line.text.is_empty())
        .map(|offset| current_idx + 1 + offset);

    let line_duration_ms = next_idx
        .map(line_time)
        .filter(|&next_time| next_time > line_start_ms)
        .map_or(DEFAULT_LINE_DURATION_MS, |next_time| next_time - line_start_ms);

    DisplayFrame {
        current_line: lines[current_idx].text.clone(),
        next_line: next_idx.map(|idx| lines[idx].text.clone()).unwrap_or_default(),
        line_start_ms,
        line_duration_ms,
        line_progress_ms: effective_ms.saturating_sub(line_start_ms).min(line_duration_ms),
        is_playing,
    }
}

/// Effective progress precedes the first line: empty current line, first
/// real line as the preview, and the gap until it as the duration.
fn before_first_line_frame(
    lyrics: &LyricsResult,
    effective_ms: u64,
    is_playing: bool,
) -> DisplayFrame {
    let Some(first_idx) = lyrics.lines.iter().position(|line| !line.text.is_empty()) else {
        return DisplayFrame::message(INSTRUMENTAL_TEXT, is_playing);
    };
    let first_time = lyrics.lines[first_idx].timestamp_ms.unwrap_or(0);
    let line_duration_ms = if first_time > 0 {
        first_time
    } else {
        DEFAULT_LINE_DURATION_MS
    };

    DisplayFrame {
        current_line: String::new(),
        next_line: lyrics.lines[first_idx].text.clone(),
        line_start_ms: 0,
        line_duration_ms,
        line_progress_ms: effective_ms.min(line_duration_ms),
        is_playing,
    }
}
