//! Time and duration conversion utilities.
//!
//! Safe conversion helpers for playback durations, with explicit
//! saturation instead of silent truncation.

use std::time::Duration;

/// Extension trait for safe Duration conversions.
pub trait DurationExt {
    /// Convert duration to milliseconds as u64, saturating at `u64::MAX`.
    ///
    /// In practice, this is always safe because durations exceeding `u64::MAX`
    /// milliseconds would represent ~584 million years.
    fn as_millis_u64(&self) -> u64;
}

impl DurationExt for Duration {
    fn as_millis_u64(&self) -> u64 {
        u64::try_from(self.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Apply a signed millisecond offset to a duration, saturating at zero.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn apply_offset(duration: Duration, offset_ms: i64) -> Duration {
    if offset_ms >= 0 {
        duration + Duration::from_millis(offset_ms as u64)
    } else {
        duration.saturating_sub(Duration::from_millis((-offset_ms) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_millis_u64() {
        let duration = Duration::from_millis(1234);
        assert_eq!(duration.as_millis_u64(), 1234);
    }

    #[test]
    fn test_as_millis_u64_zero() {
        let duration = Duration::ZERO;
        assert_eq!(duration.as_millis_u64(), 0);
    }

    #[test]
    fn test_apply_offset_positive() {
        let duration = Duration::from_millis(1_000);
        assert_eq!(apply_offset(duration, 350), Duration::from_millis(1_350));
    }

    #[test]
    fn test_apply_offset_negative() {
        let duration = Duration::from_millis(1_000);
        assert_eq!(apply_offset(duration, -400), Duration::from_millis(600));
    }

    #[test]
    fn test_apply_offset_saturates_at_zero() {
        let duration = Duration::from_millis(100);
        assert_eq!(apply_offset(duration, -500), Duration::ZERO);
    }
}
