//! Impound duration parsing and expiry calculation.
//!
//! Durations are free text entered by an operator, such as `"3 days"`,
//! `"1 week"` or `"2m"`. The unit is detected by looking for a marker letter
//! anywhere in the string, checked in a fixed order: `d` (days), then `w`
//! (weeks), then `m` (months of 30 days). A string such as `"1 day, 0 week"`
//! therefore resolves to days. Strings without any marker have no expiry.

use chrono::{NaiveDateTime, TimeDelta, Timelike};

/// The number of days counted for a month.
///
/// Months are not calendar months: `"1 month"` from January 1st expires on
/// January 31st.
pub const DAYS_PER_MONTH: i64 = 30;

/// The unit of an impound duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Whole days.
    Days,
    /// Whole weeks.
    Weeks,
    /// Months, approximated as [`DAYS_PER_MONTH`] days each.
    Months,
}

impl Unit {
    /// Detects the unit of a duration string.
    ///
    /// Returns `None` if the string contains none of the marker letters.
    #[must_use]
    pub fn detect(duration: &str) -> Option<Self> {
        if duration.contains('d') {
            Some(Self::Days)
        } else if duration.contains('w') {
            Some(Self::Weeks)
        } else if duration.contains('m') {
            Some(Self::Months)
        } else {
            None
        }
    }

    fn delta(self, count: i64) -> Option<TimeDelta> {
        match self {
            Self::Days => TimeDelta::try_days(count),
            Self::Weeks => TimeDelta::try_weeks(count),
            Self::Months => count
                .checked_mul(DAYS_PER_MONTH)
                .and_then(TimeDelta::try_days),
        }
    }
}

/// Errors that can occur while computing an expiry timestamp.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The leading token of the duration is not an integer.
    #[error("Invalid duration '{0}': expected '<integer> <unit>', e.g. '3 days'")]
    InvalidFormat(String),

    /// The expiry falls outside the representable date range.
    #[error("Duration '{0}' is out of range")]
    OutOfRange(String),
}

/// The expiry of a record was queried, but its duration has no unit.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Record has no expiry date: its duration does not specify days, weeks or months")]
pub struct MissingExpiry;

/// Computes the expiry timestamp for an impound starting at `intake`.
///
/// Returns `Ok(None)` when the duration contains no unit marker. The count is
/// only parsed once a unit has been found, so `"5"` has no expiry rather than
/// being an error.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if a unit is present but the first
/// whitespace-separated token is not an integer, and [`Error::OutOfRange`]
/// if the resulting timestamp cannot be represented.
pub fn compute_expiry(
    intake: NaiveDateTime,
    duration: &str,
) -> Result<Option<NaiveDateTime>, Error> {
    let Some(unit) = Unit::detect(duration) else {
        return Ok(None);
    };

    let count: i64 = duration
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| Error::InvalidFormat(duration.to_string()))?;

    let expiry = unit
        .delta(count)
        .and_then(|delta| truncate_to_seconds(intake).checked_add_signed(delta))
        .ok_or_else(|| Error::OutOfRange(duration.to_string()))?;

    Ok(Some(expiry))
}

/// Whether an impound with the given expiry has expired at `now`.
///
/// Expiry is strict: a record is not expired at the exact expiry instant.
///
/// # Errors
///
/// Returns [`MissingExpiry`] if `expiry` is `None`.
pub fn is_expired(expiry: Option<NaiveDateTime>, now: NaiveDateTime) -> Result<bool, MissingExpiry> {
    expiry.map(|expiry| now > expiry).ok_or(MissingExpiry)
}

/// Drops any sub-second component.
///
/// Timestamps are stored with second precision.
#[must_use]
pub fn truncate_to_seconds(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}
