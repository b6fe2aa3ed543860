//! Window matching for fixed-period recurrences.
//!
//! Occurrences of a recurring event sit on the lattice `anchor + k * period`
//! for integer `k`. Only the occurrence at or before the window start and the
//! one right after it can be the first occurrence inside the window, so the
//! check is constant time no matter how far the window is from the anchor.

use chrono::{DateTime, Utc};

use super::Period;
use crate::window::TimeWindow;

/// ## Summary
/// Returns `true` if any occurrence of an event anchored at `anchor_ms` and
/// repeating every `period` falls in the half-open window `[from_ms, to_ms)`.
///
/// All instants are epoch milliseconds.
#[must_use]
pub fn matches(anchor_ms: i64, period: Period, from_ms: i64, to_ms: i64) -> bool {
    let anchor = i128::from(anchor_ms);
    let from = i128::from(from_ms);
    let to = i128::from(to_ms);
    let in_window = |instant: i128| from <= instant && instant < to;

    if in_window(anchor) {
        return true;
    }

    let period = i128::from(period.as_millis());
    let elapsed = from - anchor;
    let last_occurrence = anchor + elapsed.div_euclid(period) * period;
    let next_occurrence = last_occurrence + period;

    in_window(last_occurrence) || in_window(next_occurrence)
}

/// ## Summary
/// [`matches`] for an anchor given as a UTC instant.
#[must_use]
pub fn occurs_within(anchor: DateTime<Utc>, period: Period, window: &TimeWindow) -> bool {
    matches(
        anchor.timestamp_millis(),
        period,
        window.from().timestamp_millis(),
        window.to().timestamp_millis(),
    )
}
