//! The process time zone.
//!
//! Without the `std` feature there is no zone database, and the local zone
//! is UTC+00:00.

use chrono::NaiveDateTime;

/// Offset of the local zone from UTC, in seconds, at the local wall-clock time `local`.
///
/// In an ambiguous period the earlier offset is used. In a skipped period
/// the offset in effect at the same UTC reading is used.
#[cfg(feature = "std")]
pub(super) fn local_offset_seconds(local: &NaiveDateTime) -> i32 {
    use chrono::{Local, Offset, TimeZone};

    match Local.offset_from_local_datetime(local).earliest() {
        Some(offset) => offset.fix().local_minus_utc(),
        None => Local.offset_from_utc_datetime(local).fix().local_minus_utc(),
    }
}

/// Converts a UTC wall-clock time to the local zone.
#[cfg(feature = "std")]
pub(super) fn utc_to_local(utc: &NaiveDateTime) -> NaiveDateTime {
    use chrono::{Local, TimeZone};

    Local.from_utc_datetime(utc).naive_local()
}

#[cfg(not(feature = "std"))]
pub(super) fn local_offset_seconds(_local: &NaiveDateTime) -> i32 {
    0
}

#[cfg(not(feature = "std"))]
pub(super) fn utc_to_local(utc: &NaiveDateTime) -> NaiveDateTime {
    *utc
}
