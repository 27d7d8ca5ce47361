use std::time::{Duration, Instant};

/// Point-in-time read of external playback state, supplied by a poller.
/// The snapshot is not re-polled on every render; the sync engine derives
/// current progress by adding wall-clock time elapsed since `observed_at`.
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    /// Source track ID of the playing track
    pub track_id: String,
    /// Playback position at the moment of observation
    pub progress: Duration,
    /// Whether playback was running when observed
    pub is_playing: bool,
    /// When this snapshot was taken (for interpolation)
    pub observed_at: Instant,
}

impl PlaybackSnapshot {
    /// Create a snapshot observed now.
    #[must_use]
    pub fn new(track_id: impl Into<String>, progress: Duration, is_playing: bool) -> Self {
        Self {
            track_id: track_id.into(),
            progress,
            is_playing,
            observed_at: Instant::now(),
        }
    }

    /// Interpolated position based on time elapsed since observation.
    /// A paused snapshot does not advance.
    #[must_use]
    pub fn effective_progress(&self) -> Duration {
        if self.is_playing {
            self.progress + self.observed_at.elapsed()
        } else {
            self.progress
        }
    }

    /// Whether the playing track differs between two snapshots.
    #[must_use]
    pub fn track_changed(&self, other: &Self) -> bool {
        self.track_id != other.track_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_snapshot_does_not_advance() {
        let snapshot = PlaybackSnapshot {
            track_id: "t1".to_string(),
            progress: Duration::from_secs(30),
            is_playing: false,
            observed_at: Instant::now() - Duration::from_secs(5),
        };

        assert_eq!(snapshot.effective_progress(), Duration::from_secs(30));
    }

    #[test]
    fn playing_snapshot_advances_with_wall_clock() {
        let snapshot = PlaybackSnapshot {
            track_id: "t1".to_string(),
            progress: Duration::from_secs(30),
            is_playing: true,
            observed_at: Instant::now() - Duration::from_secs(5),
        };

        assert!(snapshot.effective_progress() >= Duration::from_secs(35));
    }

    #[test]
    fn track_changed_compares_ids() {
        let a = PlaybackSnapshot::new("t1", Duration::ZERO, true);
        let b = PlaybackSnapshot::new("t2", Duration::ZERO, true);

        assert!(a.track_changed(&b));
        assert!(!a.track_changed(&a.clone()));
    }
}
