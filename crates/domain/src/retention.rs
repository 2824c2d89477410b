use std::fmt::{Display, Formatter};

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use pharmadesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default age in years before an audit record is archived.
pub const DEFAULT_RETENTION_YEARS: u16 = 7;

/// Default time in years an archived record is kept before it may be purged.
pub const DEFAULT_ARCHIVE_GRACE_YEARS: u16 = 1;

/// Largest accepted year count for retention windows and grace periods.
pub const MAX_RETENTION_YEARS: u16 = 100;

/// Validated number of calendar years used by retention windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct RetentionYears(u16);

impl RetentionYears {
    /// Creates a validated year count in `1..=MAX_RETENTION_YEARS`.
    pub fn new(years: u16) -> AppResult<Self> {
        if years == 0 {
            return Err(AppError::Validation(
                "retention years must be greater than zero".to_owned(),
            ));
        }

        if years > MAX_RETENTION_YEARS {
            return Err(AppError::Validation(format!(
                "retention years must not exceed {MAX_RETENTION_YEARS}, got {years}"
            )));
        }

        Ok(Self(years))
    }

    /// Returns the default archival retention window.
    #[must_use]
    pub fn default_retention() -> Self {
        Self(DEFAULT_RETENTION_YEARS)
    }

    /// Returns the default archive grace period.
    #[must_use]
    pub fn default_archive_grace() -> Self {
        Self(DEFAULT_ARCHIVE_GRACE_YEARS)
    }

    /// Returns the number of years.
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for RetentionYears {
    type Error = AppError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RetentionYears> for u16 {
    fn from(value: RetentionYears) -> Self {
        value.0
    }
}

impl Display for RetentionYears {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Subtracts whole calendar years from `instant` in its own time zone.
///
/// Only the year component changes; month, day and wall-clock time are kept.
/// February 29 moved into a non-leap year rolls over to March 1. A wall-clock
/// time that does not exist in the target year (DST gap) moves forward by one
/// hour, and an ambiguous one resolves to the earliest instant.
pub fn subtract_calendar_years<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    years: RetentionYears,
) -> AppResult<DateTime<Tz>> {
    let local = instant.naive_local();
    let target_year = local.year() - i32::from(years.get());
    let shifted = shift_year(local, target_year)?;

    resolve_local_datetime(&instant.timezone(), shifted)
}

fn shift_year(value: NaiveDateTime, target_year: i32) -> AppResult<NaiveDateTime> {
    if let Some(shifted) = value.with_year(target_year) {
        return Ok(shifted);
    }

    // Only Feb 29 fails to carry over; it overflows into the next day.
    NaiveDate::from_ymd_opt(target_year, 3, 1)
        .map(|date| date.and_time(value.time()))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "cannot move '{value}' to calendar year {target_year}"
            ))
        })
}

/// Resolves a wall-clock time in `timezone`.
///
/// Ambiguous times pick the earliest instant; times inside a DST gap move
/// forward by one hour.
pub fn resolve_local_datetime<Tz: TimeZone>(
    timezone: &Tz,
    value: NaiveDateTime,
) -> AppResult<DateTime<Tz>> {
    match timezone.from_local_datetime(&value) {
        LocalResult::Single(resolved) => Ok(resolved),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => value
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|forward| timezone.from_local_datetime(&forward).earliest())
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "local time '{value}' cannot be resolved in the server time zone"
                ))
            }),
    }
}
