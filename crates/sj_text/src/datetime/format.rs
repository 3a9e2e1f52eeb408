use core::fmt::{self, Write};

use chrono::{Datelike, Timelike};

use super::zone::local_offset_seconds;
use crate::{DateTime, DateTimeKind, JsonBuffer, JsonUnit};

/// Writes `YYYY-MM-DDTHH:mm:ss[.fff][Z|±HH:MM]`.
///
/// The fraction keeps only the significant digits of the milliseconds.
pub(super) fn write_iso(value: &DateTime, out: &mut impl Write) -> fmt::Result {
    let naive = value.naive();

    write!(
        out,
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        naive.year(),
        naive.month(),
        naive.day(),
        naive.hour(),
        naive.minute(),
        naive.second(),
    )?;

    let mut millis = value.millisecond();
    if millis != 0 {
        let mut digits = 3;
        while millis % 10 == 0 {
            millis /= 10;
            digits -= 1;
        }
        write!(out, ".{millis:0digits$}")?;
    }

    match value.kind() {
        DateTimeKind::Unspecified => Ok(()),
        DateTimeKind::Utc => out.write_char('Z'),
        DateTimeKind::Local => {
            let minutes = local_offset_seconds(&naive) / 60;
            let sign = if minutes < 0 { '-' } else { '+' };
            let minutes = minutes.unsigned_abs();
            write!(out, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)
        }
    }
}

impl<U: JsonUnit> JsonBuffer<U> {
    /// Appends `value` as a quoted ISO-8601 string.
    ///
    /// # Examples
    ///
    /// ```
    /// use sj_text::{DateTime, DateTimeKind, JsonBuffer};
    ///
    /// let dt = DateTime::from_parts(2017, 7, 25, 23, 59, 58, 500, DateTimeKind::Utc).unwrap();
    ///
    /// let mut out = JsonBuffer::<u8>::new();
    /// out.append_date_time(&dt);
    /// assert_eq!(out.as_slice(), br#""2017-07-25T23:59:58.5Z""#);
    /// ```
    pub fn append_date_time(&mut self, value: &DateTime) {
        self.push_ascii(b'"');
        let _ = write_iso(value, self);
        self.push_ascii(b'"');
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{DateTime, DateTimeKind};

    fn utc(millis: u32) -> DateTime {
        DateTime::from_parts(2017, 7, 25, 23, 59, 58, millis, DateTimeKind::Utc).unwrap()
    }

    #[test]
    fn fraction_digits() {
        assert_eq!(utc(0).to_string(), "2017-07-25T23:59:58Z");
        assert_eq!(utc(555).to_string(), "2017-07-25T23:59:58.555Z");
        assert_eq!(utc(500).to_string(), "2017-07-25T23:59:58.5Z");
        assert_eq!(utc(120).to_string(), "2017-07-25T23:59:58.12Z");
        assert_eq!(utc(5).to_string(), "2017-07-25T23:59:58.005Z");
        assert_eq!(utc(50).to_string(), "2017-07-25T23:59:58.05Z");
    }

    #[test]
    fn unspecified_has_no_suffix() {
        let dt = utc(0).with_kind(DateTimeKind::Unspecified);
        assert_eq!(dt.to_string(), "2017-07-25T23:59:58");
    }

    #[test]
    fn local_has_offset_suffix() {
        let text = utc(1).with_kind(DateTimeKind::Local).to_string();
        let (head, zone) = text.split_at(text.len() - 6);

        assert_eq!(head, "2017-07-25T23:59:58.001");
        let zone = zone.as_bytes();
        assert!(zone[0] == b'+' || zone[0] == b'-');
        assert_eq!(zone[3], b':');

        if cfg!(not(feature = "std")) {
            assert_eq!(zone, b"+00:00");
        }
    }

    #[test]
    fn sub_millisecond_precision_is_dropped() {
        let naive = utc(0).naive() + chrono::TimeDelta::microseconds(1_999);
        let dt = DateTime::new(naive, DateTimeKind::Utc).unwrap();
        assert_eq!(dt.to_string(), "2017-07-25T23:59:58.001Z");
    }
}
