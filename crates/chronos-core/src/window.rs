//! Query windows for event listings.

use chrono::{DateTime, Days, Months, Utc};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// Days before "now" covered by the default window.
pub const DEFAULT_DAYS_BEFORE: u64 = 3;
/// Days after "now" covered by the default window.
pub const DEFAULT_DAYS_AFTER: u64 = 4;

/// Instant range of a listing.
///
/// Occurrences of recurring events are matched over `[from, to)`, while a
/// one-off start is accepted over `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TimeWindow {
    /// ## Errors
    /// Returns `ValidationError` if `to` is before `from`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> CoreResult<Self> {
        if to < from {
            return Err(CoreError::ValidationError(
                "toDate must not be before fromDate".to_string(),
            ));
        }
        Ok(Self { from, to })
    }

    #[must_use]
    pub const fn from(&self) -> DateTime<Utc> {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> DateTime<Utc> {
        self.to
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant < self.to
    }

    /// Whether a one-off start falls in the window, `to` included.
    #[must_use]
    pub fn contains_start(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant <= self.to
    }

    /// ## Summary
    /// Builds the window for an event listing.
    ///
    /// With no bounds the window is `[now - 3 days, now + 4 days)`. When only
    /// one bound is given the other keeps the default seven-day span. The
    /// window may not reach past one calendar month after `from`; when that
    /// month is shorter, the limit is its last day, so January 31st allows up
    /// to the end of February rather than rolling into March.
    ///
    /// ## Errors
    /// Returns `ValidationError` if the range is inverted or longer than a month.
    pub fn resolve(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let span = Days::new(DEFAULT_DAYS_BEFORE + DEFAULT_DAYS_AFTER);
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            (Some(from), None) => (from, add_days(from, span)?),
            (None, Some(to)) => (sub_days(to, span)?, to),
            (None, None) => (
                sub_days(now, Days::new(DEFAULT_DAYS_BEFORE))?,
                add_days(now, Days::new(DEFAULT_DAYS_AFTER))?,
            ),
        };

        let window = Self::new(from, to)?;

        let one_month_later = from
            .checked_add_months(Months::new(1))
            .ok_or(CoreError::InvalidInput("fromDate is out of range".to_string()))?;
        if window.to > one_month_later {
            return Err(CoreError::ValidationError(
                "Date range must be within one month".to_string(),
            ));
        }

        Ok(window)
    }
}

fn add_days(instant: DateTime<Utc>, days: Days) -> CoreResult<DateTime<Utc>> {
    instant
        .checked_add_days(days)
        .ok_or(CoreError::InvalidInput("date is out of range".to_string()))
}

fn sub_days(instant: DateTime<Utc>, days: Days) -> CoreResult<DateTime<Utc>> {
    instant
        .checked_sub_days(days)
        .ok_or(CoreError::InvalidInput("date is out of range".to_string()))
}
