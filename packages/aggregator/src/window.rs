//! Trailing time window used for "recent" incident queries.

use chrono::{DateTime, Duration, Utc};

/// Default length of the recent window, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// A trailing window of whole days ending at "now".
///
/// The lower bound is inclusive: an incident stamped exactly
/// `now - days` is inside the window. There is no upper bound, so
/// future-dated incidents are also inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentWindow {
    /// Window length in days.
    pub days: u32,
}

impl RecentWindow {
    /// Creates a window of `days` days.
    #[must_use]
    pub const fn days(days: u32) -> Self {
        Self { days }
    }

    /// Earliest timestamp inside the window.
    ///
    /// Saturates at [`DateTime::MIN_UTC`] when the window reaches past the
    /// earliest representable time.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether `timestamp` falls inside the window ending at `now`.
    #[must_use]
    pub fn contains(self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        timestamp >= self.cutoff(now)
    }
}

impl Default for RecentWindow {
    fn default() -> Self {
        Self::days(DEFAULT_WINDOW_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn boundary_is_inclusive() {
        let window = RecentWindow::default();
        let boundary = Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap();
        assert_eq!(window.cutoff(now()), boundary);
        assert!(window.contains(boundary, now()));
        assert!(!window.contains(boundary - Duration::seconds(1), now()));
    }

    #[test]
    fn future_timestamps_are_inside() {
        let window = RecentWindow::days(1);
        assert!(window.contains(now() + Duration::days(3), now()));
    }

    #[test]
    fn huge_window_covers_all_time() {
        let window = RecentWindow::days(u32::MAX);
        assert_eq!(window.cutoff(now()), DateTime::<Utc>::MIN_UTC);
        assert!(window.contains(now() - Duration::days(1), now()));
        assert!(window.contains(DateTime::<Utc>::MIN_UTC, now()));
    }

    #[test]
    fn zero_day_window_starts_now() {
        let window = RecentWindow::days(0);
        assert!(window.contains(now(), now()));
        assert!(!window.contains(now() - Duration::milliseconds(1), now()));
    }
}
