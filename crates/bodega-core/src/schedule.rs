//! # Delivery Slot Scheduling
//!
//! Policies that turn a requested delivery time into a bounded list of
//! candidate slot windows.
//!
//! ## Two Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RollingWindowPolicy                                                    │
//! │                                                                         │
//! │   08:00      11:00      14:00      17:00      20:00                     │
//! │   ├── cap 10 ─┼── cap 10 ─┼── cap 10 ─┼── cap 10 ─┤  ...               │
//! │   Fixed-width windows anchored at the store-open hour. A request is    │
//! │   aligned DOWN into its containing window, then windows advance        │
//! │   forward until one has room.                                           │
//! │                                                                         │
//! │  BusinessDayShiftPolicy                                                 │
//! │                                                                         │
//! │   Mon          Tue          Sat  Sun   Mon                             │
//! │   [AM][PM]     [AM][PM]     ✗    ✗     [AM][PM]                        │
//! │   cap 20 each. Orders placed after the 07:30 cutoff roll to the next   │
//! │   business day; weekends are skipped entirely.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Bounded Search
//! Both policies emit a FINITE window list capped by a planning horizon
//! (default 14 days). The caller walks the list counting existing orders per
//! window; running out of candidates means no capacity, never an infinite
//! loop.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

// =============================================================================
// Slot Window
// =============================================================================

/// A half-open delivery window `[start, end)` with bounded order capacity.
///
/// Windows are derived, not persisted: occupancy is computed by counting
/// orders whose delivery timestamp falls inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SlotWindow {
    /// Checks whether a timestamp falls inside this window.
    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

// =============================================================================
// Slot Policy
// =============================================================================

/// A pluggable delivery-slot strategy.
///
/// A policy only does calendar math; it never touches storage. The checkout
/// orchestrator walks `candidate_windows` in order, counting committed
/// orders per window, and assigns the first window with fewer than
/// `capacity()` orders.
pub trait SlotPolicy: Send + Sync {
    /// Maximum orders per window.
    fn capacity(&self) -> i64;

    /// Candidate windows for a request at `requested`, earliest first.
    ///
    /// ## Contract
    /// - Finite: bounded by the policy's planning horizon
    /// - Ordered: starts are strictly increasing
    /// - Relevant: no window ends at or before `requested`
    fn candidate_windows(&self, requested: DateTime<Utc>) -> Vec<SlotWindow>;
}

// =============================================================================
// Rolling Window Policy
// =============================================================================

/// Fixed-width windows anchored at the store-open hour, searched forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingWindowPolicy {
    /// Window width in hours (e.g. 3).
    pub width_hours: i64,
    /// Maximum orders per window.
    pub capacity: i64,
    /// Hour of day (UTC) windows are anchored to, so a 3-hour width with
    /// anchor 8 yields 08:00, 11:00, 14:00, ...
    pub anchor_hour: i64,
    /// Planning horizon in days; the search never reaches past it.
    pub horizon_days: i64,
}

impl Default for RollingWindowPolicy {
    fn default() -> Self {
        RollingWindowPolicy {
            width_hours: 3,
            capacity: 10,
            anchor_hour: 8,
            horizon_days: 14,
        }
    }
}

impl RollingWindowPolicy {
    /// Aligns a timestamp down to the start of its containing window.
    fn align_down(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let width = self.width_hours * 3600;
        let offset = self.anchor_hour * 3600;
        let aligned = (t.timestamp() - offset).div_euclid(width) * width + offset;
        // Alignment of a valid timestamp stays in range.
        DateTime::<Utc>::from_timestamp(aligned, 0).unwrap_or(t)
    }
}

impl SlotPolicy for RollingWindowPolicy {
    fn capacity(&self) -> i64 {
        self.capacity
    }

    fn candidate_windows(&self, requested: DateTime<Utc>) -> Vec<SlotWindow> {
        let width = Duration::hours(self.width_hours);
        let count = (self.horizon_days * 24) / self.width_hours;

        let mut windows = Vec::with_capacity(count as usize);
        let mut start = self.align_down(requested);
        for _ in 0..count {
            windows.push(SlotWindow {
                start,
                end: start + width,
            });
            start += width;
        }
        windows
    }
}

// =============================================================================
// Business-Day Shift Policy
// =============================================================================

/// Business-day scheduling: a morning and an afternoon shift per weekday.
///
/// Orders placed after the cutoff roll to the next business day. Within an
/// eligible day the morning shift fills first, then the afternoon, then the
/// search rolls forward a business day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessDayShiftPolicy {
    /// Same-day ordering cutoff (e.g. 07:30). Requests after it roll over.
    pub cutoff: NaiveTime,
    /// Start of the morning shift.
    pub morning_start: NaiveTime,
    /// Start of the afternoon shift (and end of the morning one).
    pub afternoon_start: NaiveTime,
    /// End of the afternoon shift.
    pub day_end: NaiveTime,
    /// Maximum orders per shift.
    pub capacity: i64,
    /// Planning horizon in calendar days.
    pub horizon_days: i64,
}

impl Default for BusinessDayShiftPolicy {
    fn default() -> Self {
        BusinessDayShiftPolicy {
            cutoff: NaiveTime::from_hms_opt(7, 30, 0).expect("valid cutoff time"),
            morning_start: NaiveTime::from_hms_opt(9, 0, 0).expect("valid shift time"),
            afternoon_start: NaiveTime::from_hms_opt(14, 0, 0).expect("valid shift time"),
            day_end: NaiveTime::from_hms_opt(19, 0, 0).expect("valid shift time"),
            capacity: 20,
            horizon_days: 14,
        }
    }
}

/// A Saturday or Sunday carries no delivery shifts.
fn is_business_day(day: NaiveDate) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

impl SlotPolicy for BusinessDayShiftPolicy {
    fn capacity(&self) -> i64 {
        self.capacity
    }

    fn candidate_windows(&self, requested: DateTime<Utc>) -> Vec<SlotWindow> {
        let mut day = requested.date_naive();

        // Past the cutoff, same-day delivery is no longer offered.
        if requested.time() > self.cutoff {
            day = day.succ_opt().unwrap_or(day);
        }

        let last = requested.date_naive() + Duration::days(self.horizon_days);
        let mut windows = Vec::new();

        while day <= last {
            if is_business_day(day) {
                windows.push(SlotWindow {
                    start: day.and_time(self.morning_start).and_utc(),
                    end: day.and_time(self.afternoon_start).and_utc(),
                });
                windows.push(SlotWindow {
                    start: day.and_time(self.afternoon_start).and_utc(),
                    end: day.and_time(self.day_end).and_utc(),
                });
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        windows
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_rolling_alignment_to_containing_window() {
        let policy = RollingWindowPolicy::default();
        // 09:00 with anchor 8 and width 3 → containing window [08:00, 11:00)
        let windows = policy.candidate_windows(at(2026, 3, 2, 9, 0));

        assert_eq!(windows[0].start, at(2026, 3, 2, 8, 0));
        assert_eq!(windows[0].end, at(2026, 3, 2, 11, 0));
        assert_eq!(windows[1].start, at(2026, 3, 2, 11, 0));
    }

    #[test]
    fn test_rolling_exact_boundary_starts_own_window() {
        let policy = RollingWindowPolicy::default();
        let windows = policy.candidate_windows(at(2026, 3, 2, 11, 0));
        assert_eq!(windows[0].start, at(2026, 3, 2, 11, 0));
    }

    #[test]
    fn test_rolling_before_anchor_aligns_into_previous_day() {
        let policy = RollingWindowPolicy::default();
        // 07:00 with anchor 8 → containing window started 05:00
        let windows = policy.candidate_windows(at(2026, 3, 2, 7, 0));
        assert_eq!(windows[0].start, at(2026, 3, 2, 5, 0));
    }

    #[test]
    fn test_rolling_horizon_bounds_search() {
        let policy = RollingWindowPolicy::default();
        let requested = at(2026, 3, 2, 9, 0);
        let windows = policy.candidate_windows(requested);

        // 14 days × 8 windows/day
        assert_eq!(windows.len(), 112);
        let last = windows.last().unwrap();
        assert!(last.end <= requested + Duration::days(15));
    }

    #[test]
    fn test_windows_are_strictly_increasing_and_relevant() {
        let policy = RollingWindowPolicy::default();
        let requested = at(2026, 3, 2, 9, 30);
        let windows = policy.candidate_windows(requested);

        for pair in windows.windows(2) {
            assert!(pair[0].start < pair[1].start);
        }
        // No candidate has already fully passed.
        assert!(windows.iter().all(|w| w.end > requested));
    }

    #[test]
    fn test_window_contains() {
        let w = SlotWindow {
            start: at(2026, 3, 2, 8, 0),
            end: at(2026, 3, 2, 11, 0),
        };
        assert!(w.contains(at(2026, 3, 2, 8, 0)));
        assert!(w.contains(at(2026, 3, 2, 10, 59)));
        assert!(!w.contains(at(2026, 3, 2, 11, 0)));
    }

    #[test]
    fn test_business_day_before_cutoff_keeps_same_day() {
        let policy = BusinessDayShiftPolicy::default();
        // Monday 2026-03-02, 07:00 — before the 07:30 cutoff
        let windows = policy.candidate_windows(at(2026, 3, 2, 7, 0));

        assert_eq!(windows[0].start, at(2026, 3, 2, 9, 0)); // morning first
        assert_eq!(windows[1].start, at(2026, 3, 2, 14, 0)); // then afternoon
    }

    #[test]
    fn test_business_day_after_cutoff_rolls_forward() {
        let policy = BusinessDayShiftPolicy::default();
        // Monday 08:00 — past cutoff, first candidate is Tuesday morning
        let windows = policy.candidate_windows(at(2026, 3, 2, 8, 0));
        assert_eq!(windows[0].start, at(2026, 3, 3, 9, 0));
    }

    #[test]
    fn test_business_day_skips_weekends() {
        let policy = BusinessDayShiftPolicy::default();
        // Friday 2026-03-06 past cutoff → Saturday/Sunday skipped → Monday
        let windows = policy.candidate_windows(at(2026, 3, 6, 12, 0));
        assert_eq!(windows[0].start, at(2026, 3, 9, 9, 0));

        for w in &windows {
            assert!(is_business_day(w.start.date_naive()));
        }
    }

    #[test]
    fn test_business_day_horizon_bound() {
        let policy = BusinessDayShiftPolicy::default();
        let requested = at(2026, 3, 2, 7, 0);
        let windows = policy.candidate_windows(requested);

        // ≤ 2 shifts per eligible day over a 14-day horizon
        assert!(windows.len() <= 2 * 15);
        assert!(!windows.is_empty());
        let last = windows.last().unwrap();
        assert!(last.start <= requested + Duration::days(15));
    }
}
