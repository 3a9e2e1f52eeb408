//! ISO-8601 date-times with a zone classification.
//!
//! The wire grammar is `YYYY-MM-DD[THH:mm:ss[.fraction][Z|±HH:MM]]`, quoted.

use core::fmt;
use core::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

// -----------------------------------------------------------------------------
// Modules

mod format;
mod parse;
mod zone;

// -----------------------------------------------------------------------------
// DateTimeKind

/// How a [`DateTime`] relates to a time zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    /// No zone information. Written without a suffix.
    #[default]
    Unspecified,
    /// A UTC wall-clock time. Written with a `Z` suffix.
    Utc,
    /// A wall-clock time in the local zone. Written with the local
    /// `±HH:MM` offset at that instant.
    Local,
}

// -----------------------------------------------------------------------------
// DateTime

/// A wall-clock date-time at millisecond precision plus its [`DateTimeKind`].
///
/// The year is always within [`DateTime::YEARS`], the four digits the wire
/// format has room for.
///
/// # Examples
///
/// ```
/// use sj_text::{DateTime, DateTimeKind};
///
/// let dt = DateTime::from_parts(2017, 7, 25, 23, 59, 58, 555, DateTimeKind::Utc).unwrap();
/// assert_eq!(dt.to_string(), "2017-07-25T23:59:58.555Z");
///
/// let date = DateTime::from_ymd(2017, 7, 25).unwrap();
/// assert_eq!(date.to_string(), "2017-07-25T00:00:00");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateTime {
    naive: NaiveDateTime,
    kind: DateTimeKind,
}

impl DateTime {
    /// The years a date-time can hold.
    pub const YEARS: RangeInclusive<i32> = 0..=9999;

    /// Creates a date-time, truncating sub-millisecond precision.
    ///
    /// Returns `None` if the year is outside [`DateTime::YEARS`].
    pub fn new(naive: NaiveDateTime, kind: DateTimeKind) -> Option<Self> {
        if !Self::YEARS.contains(&naive.year()) {
            return None;
        }
        let nanos = naive.nanosecond();
        let naive = naive
            .with_nanosecond(nanos - nanos % 1_000_000)
            .unwrap_or(naive);
        Some(Self { naive, kind })
    }

    /// Creates a date-time from its components.
    ///
    /// Returns `None` if any component is out of range, the year included.
    ///
    /// ```
    /// use sj_text::{DateTime, DateTimeKind};
    ///
    /// assert!(DateTime::from_parts(0, 1, 1, 0, 0, 0, 0, DateTimeKind::Utc).is_some());
    /// assert!(DateTime::from_parts(-1, 12, 31, 0, 0, 0, 0, DateTimeKind::Utc).is_none());
    /// assert!(DateTime::from_parts(10_000, 1, 1, 0, 0, 0, 0, DateTimeKind::Utc).is_none());
    /// ```
    pub fn from_parts(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
        kind: DateTimeKind,
    ) -> Option<Self> {
        if millisecond >= 1000 || !Self::YEARS.contains(&year) {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millisecond)?;
        Some(Self {
            naive: date.and_time(time),
            kind,
        })
    }

    /// Creates a midnight date-time of kind [`DateTimeKind::Unspecified`].
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        if !Self::YEARS.contains(&year) {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self {
            naive: date.and_time(NaiveTime::MIN),
            kind: DateTimeKind::Unspecified,
        })
    }

    /// The wall-clock value.
    #[inline]
    pub const fn naive(&self) -> NaiveDateTime {
        self.naive
    }

    #[inline]
    pub const fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// The millisecond part, `0..1000`.
    #[inline]
    pub fn millisecond(&self) -> u32 {
        (self.naive.nanosecond() / 1_000_000).min(999)
    }

    /// Returns the same wall-clock value with another kind.
    #[inline]
    pub const fn with_kind(self, kind: DateTimeKind) -> Self {
        Self {
            naive: self.naive,
            kind,
        }
    }
}

impl fmt::Display for DateTime {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::write_iso(self, f)
    }
}
