//! Fixed-period event recurrence.
//!
//! A recurring event repeats every `interval` units of a [`Frequency`], where
//! every unit has a fixed length in milliseconds. Months are 30 days and years
//! are 365 days; the model is deliberately not calendar aware.
//!
//! - [`derive_period`] turns a (frequency, interval) pair into a [`Period`].
//! - [`RecurrenceRule`] keeps the three values consistent.
//! - [`matcher`] decides whether a recurring event touches a query window.

pub mod matcher;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use matcher::{matches, occurs_within};

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;
pub const WEEK_MS: i64 = 7 * DAY_MS;
pub const MONTH_MS: i64 = 30 * DAY_MS;
pub const YEAR_MS: i64 = 365 * DAY_MS;

/// Unit of repetition for a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Self; 6] = [
        Self::Minutely,
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minutely => "minutely",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Length of a single unit in milliseconds.
    #[must_use]
    pub const fn unit_millis(self) -> i64 {
        match self {
            Self::Minutely => MINUTE_MS,
            Self::Hourly => HOUR_MS,
            Self::Daily => DAY_MS,
            Self::Weekly => WEEK_MS,
            Self::Monthly => MONTH_MS,
            Self::Yearly => YEAR_MS,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|freq| freq.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidFrequency(s.to_string()))
    }
}

/// A strictly positive repeat period in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Period(i64);

impl Period {
    /// ## Summary
    /// Wraps a millisecond count.
    ///
    /// ## Errors
    /// Returns `InvalidPeriod` if `millis <= 0`.
    pub const fn from_millis(millis: i64) -> CoreResult<Self> {
        if millis <= 0 {
            return Err(CoreError::InvalidPeriod(millis));
        }
        Ok(Self(millis))
    }

    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn as_time_delta(self) -> chrono::TimeDelta {
        chrono::TimeDelta::milliseconds(self.0)
    }
}

/// ## Summary
/// Derives the repeat period for `interval` units of `frequency`.
///
/// ## Errors
/// Returns `InvalidInterval` if `interval` is not positive, or
/// `IntervalOverflow` if the period does not fit in 64 bits.
pub fn derive_period(frequency: Frequency, interval: i32) -> CoreResult<Period> {
    if interval <= 0 {
        return Err(CoreError::InvalidInterval(i64::from(interval)));
    }
    let millis = frequency
        .unit_millis()
        .checked_mul(i64::from(interval))
        .ok_or(CoreError::IntervalOverflow(i64::from(interval)))?;
    Period::from_millis(millis)
}

/// ## Summary
/// Same as [`derive_period`] for a frequency given by name.
///
/// ## Errors
/// Returns `InvalidFrequency` for names outside the supported set and
/// `InvalidInterval` for non-positive intervals.
pub fn derive_period_named(frequency: &str, interval: i32) -> CoreResult<Period> {
    derive_period(frequency.parse()?, interval)
}

/// Recurrence of an event: a frequency, an interval and the period derived
/// from both. The period can only change through [`RecurrenceRule::reschedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: i32,
    period: Period,
}

impl RecurrenceRule {
    /// ## Errors
    /// Returns `InvalidInterval` if `interval` is not positive.
    pub fn new(frequency: Frequency, interval: i32) -> CoreResult<Self> {
        let period = derive_period(frequency, interval)?;
        Ok(Self {
            frequency,
            interval,
            period,
        })
    }

    /// ## Summary
    /// Replaces frequency and interval, recomputing the period. On error the
    /// rule is left untouched.
    ///
    /// ## Errors
    /// Returns `InvalidInterval` if `interval` is not positive.
    pub fn reschedule(&mut self, frequency: Frequency, interval: i32) -> CoreResult<()> {
        *self = Self::new(frequency, interval)?;
        Ok(())
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub const fn interval(&self) -> i32 {
        self.interval
    }

    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }
}
