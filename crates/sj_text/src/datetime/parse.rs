use chrono::{NaiveDate, NaiveTime, TimeDelta};

use super::zone::utc_to_local;
use crate::{Cursor, DateTime, DateTimeKind, ErrorKind, JsonError, JsonUnit};

impl<U: JsonUnit> Cursor<'_, U> {
    /// Reads a quoted ISO-8601 date-time.
    ///
    /// Grammar, after optional leading whitespace:
    ///
    /// ```text
    /// "YYYY-MM-DD[THH:mm:ss[.f+][Z|±HH:MM]]"
    /// ```
    ///
    /// - Without a time the value is midnight.
    /// - The fraction may have any number of digits and is rounded half-up
    ///   to the millisecond, carrying into the seconds.
    /// - Without a zone the kind is [`DateTimeKind::Unspecified`], `Z` gives
    ///   [`DateTimeKind::Utc`], and an offset is applied to get UTC which is
    ///   then converted to the local zone with kind [`DateTimeKind::Local`].
    ///
    /// Only the date-time literal is consumed.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidDateTime`] for any grammar violation or
    /// out-of-range component, including a year that leaves
    /// [`DateTime::YEARS`] once rounding or the offset is applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use sj_text::{Cursor, DateTimeKind};
    ///
    /// let mut cursor = Cursor::new(br#" "2017-07-25T23:59:58.12345678Z", "2017-07-25""#);
    ///
    /// let first = cursor.read_date_time().unwrap();
    /// assert_eq!(first.kind(), DateTimeKind::Utc);
    /// assert_eq!(first.millisecond(), 123);
    ///
    /// cursor.expect(b',').unwrap();
    /// let second = cursor.read_date_time().unwrap();
    /// assert_eq!(second.kind(), DateTimeKind::Unspecified);
    /// assert_eq!(second.to_string(), "2017-07-25T00:00:00");
    /// ```
    pub fn read_date_time(&mut self) -> Result<DateTime, JsonError> {
        self.skip_whitespace();
        self.expect_quote()?;

        let start = self.position();
        let year = self.fixed_digits(4)?;
        self.date_separator(b'-')?;
        let month = self.fixed_digits(2)?;
        self.date_separator(b'-')?;
        let day = self.fixed_digits(2)?;

        let date = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| self.date_error_at(start, "date out of range"))?;

        if !self.consume(b'T') {
            self.closing_quote()?;
            let naive = date.and_time(NaiveTime::MIN);
            return DateTime::new(naive, DateTimeKind::Unspecified)
                .ok_or_else(|| self.date_error_at(start, "date out of range"));
        }

        let time_start = self.position();
        let hour = self.fixed_digits(2)?;
        self.date_separator(b':')?;
        let minute = self.fixed_digits(2)?;
        self.date_separator(b':')?;
        let second = self.fixed_digits(2)?;

        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| self.date_error_at(time_start, "time out of range"))?;

        let millis = if self.consume(b'.') {
            self.fraction_millis()?
        } else {
            0
        };

        let naive = date.and_time(time) + TimeDelta::milliseconds(millis);

        let value = match self.peek_byte() {
            Some(b'Z') => {
                self.advance(1);
                DateTime::new(naive, DateTimeKind::Utc)
            }
            Some(sign @ (b'+' | b'-')) => {
                let offset_start = self.position();
                self.advance(1);
                let hours = self.fixed_digits(2)?;
                self.date_separator(b':')?;
                let minutes = self.fixed_digits(2)?;

                if hours > 23 || minutes > 59 {
                    return Err(self.date_error_at(offset_start, "offset out of range"));
                }

                let offset = TimeDelta::minutes((hours * 60 + minutes) as i64);
                let utc = if sign == b'+' { naive - offset } else { naive + offset };
                DateTime::new(utc, DateTimeKind::Utc)
                    .and_then(|_| DateTime::new(utc_to_local(&utc), DateTimeKind::Local))
            }
            _ => DateTime::new(naive, DateTimeKind::Unspecified),
        };

        let value = value.ok_or_else(|| self.date_error_at(start, "year out of range"))?;
        self.closing_quote()?;
        Ok(value)
    }

    /// Reads exactly `count` ASCII digits.
    fn fixed_digits(&mut self, count: usize) -> Result<u32, JsonError> {
        let mut value = 0;
        for _ in 0..count {
            match self.peek_byte() {
                Some(digit @ b'0'..=b'9') => {
                    value = value * 10 + (digit - b'0') as u32;
                    self.advance(1);
                }
                _ => return Err(self.date_error("expected a digit")),
            }
        }
        Ok(value)
    }

    fn date_separator(&mut self, byte: u8) -> Result<(), JsonError> {
        if self.consume(byte) {
            Ok(())
        } else {
            Err(self.date_error("unexpected separator"))
        }
    }

    /// Reads one or more fraction digits, rounded half-up to milliseconds.
    ///
    /// May return 1000.
    fn fraction_millis(&mut self) -> Result<i64, JsonError> {
        let mut millis = 0;
        let mut digits = 0;
        let mut round_up = false;

        while let Some(digit @ b'0'..=b'9') = self.peek_byte() {
            let digit = (digit - b'0') as i64;
            match digits {
                0..3 => millis = millis * 10 + digit,
                3 => round_up = digit >= 5,
                _ => {}
            }
            digits += 1;
            self.advance(1);
        }

        if digits == 0 {
            return Err(self.date_error("expected a fraction digit"));
        }

        for _ in digits..3 {
            millis *= 10;
        }
        Ok(millis + round_up as i64)
    }

    fn closing_quote(&mut self) -> Result<(), JsonError> {
        if self.consume(b'"') {
            return Ok(());
        }
        if self.is_at_end() {
            return Err(self.error_here(ErrorKind::UnexpectedEndOfInput, "unterminated date-time"));
        }
        Err(self.date_error("unexpected character in date-time"))
    }

    #[cold]
    fn date_error(&self, message: &'static str) -> JsonError {
        if self.is_at_end() {
            return self.error_here(ErrorKind::UnexpectedEndOfInput, message);
        }
        self.error_here(ErrorKind::InvalidDateTime, message)
    }

    #[cold]
    fn date_error_at(&self, position: usize, message: &'static str) -> JsonError {
        JsonError::at(ErrorKind::InvalidDateTime, self.input(), position, message)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    use crate::{Cursor, DateTime, DateTimeKind, ErrorKind, JsonBuffer};

    fn parse(text: &str) -> Result<DateTime, crate::JsonError> {
        let bytes = Cursor::new(text.as_bytes()).read_date_time();

        let units: Vec<u16> = text.encode_utf16().collect();
        let units = Cursor::new(&units).read_date_time();
        assert_eq!(bytes, units, "{text}");

        bytes
    }

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
    }

    #[test]
    fn date_only_is_midnight() {
        let dt = parse(r#""2017-07-25""#).unwrap();
        assert_eq!(dt.naive(), naive(2017, 7, 25, 0, 0, 0, 0));
        assert_eq!(dt.kind(), DateTimeKind::Unspecified);
    }

    #[test]
    fn fraction_rounds_to_millis() {
        let dt = parse(r#""2017-07-25T23:59:58.12345678Z""#).unwrap();
        assert_eq!(dt.naive(), naive(2017, 7, 25, 23, 59, 58, 123));
        assert_eq!(dt.kind(), DateTimeKind::Utc);

        let dt = parse(r#""2017-07-25T23:59:58.1235""#).unwrap();
        assert_eq!(dt.millisecond(), 124);
        assert_eq!(dt.kind(), DateTimeKind::Unspecified);

        let dt = parse(r#""2017-07-25T23:59:58.5""#).unwrap();
        assert_eq!(dt.millisecond(), 500);
    }

    #[test]
    fn rounding_carries_across_day() {
        let dt = parse(r#""2017-12-31T23:59:59.9996Z""#).unwrap();
        assert_eq!(dt.naive(), naive(2018, 1, 1, 0, 0, 0, 0));
    }

    #[test]
    fn offset_converts_to_local() {
        let dt = parse(r#""2017-07-25T23:59:58+03:15""#).unwrap();
        assert_eq!(dt.kind(), DateTimeKind::Local);

        let utc = naive(2017, 7, 25, 20, 44, 58, 0);

        #[cfg(feature = "std")]
        let expected = {
            use chrono::TimeZone;
            chrono::Local.from_utc_datetime(&utc).naive_local()
        };
        #[cfg(not(feature = "std"))]
        let expected = utc;

        assert_eq!(dt.naive(), expected);
    }

    #[test]
    fn negative_offset() {
        let dt = parse(r#""2017-07-25T01:00:00-02:30""#).unwrap();
        let utc = naive(2017, 7, 25, 3, 30, 0, 0);

        #[cfg(feature = "std")]
        let expected = {
            use chrono::TimeZone;
            chrono::Local.from_utc_datetime(&utc).naive_local()
        };
        #[cfg(not(feature = "std"))]
        let expected = utc;

        assert_eq!(dt.naive(), expected);
    }

    #[test]
    fn round_trip_keeps_kind_and_precision() {
        let values = [
            DateTime::from_parts(2017, 7, 25, 23, 59, 58, 555, DateTimeKind::Utc),
            DateTime::from_parts(1999, 1, 2, 3, 4, 5, 600, DateTimeKind::Unspecified),
            DateTime::from_parts(2024, 2, 29, 12, 0, 0, 0, DateTimeKind::Local),
        ];

        for value in values.map(Option::unwrap) {
            let mut out = JsonBuffer::<u16>::new();
            out.append_date_time(&value);
            let back = Cursor::new(out.as_slice()).read_date_time().unwrap();
            assert_eq!(back, value, "{value}");
        }
    }

    #[test]
    fn repeated_reads_in_one_buffer() {
        let text = r#"["2017-07-25", "2017-07-26T10:00:00Z"]"#;
        let mut cursor = Cursor::new(text.as_bytes());

        cursor.expect(b'[').unwrap();
        let first = cursor.read_date_time().unwrap();
        cursor.expect(b',').unwrap();
        let second = cursor.read_date_time().unwrap();
        cursor.expect(b']').unwrap();

        assert_eq!(first.to_string(), "2017-07-25T00:00:00");
        assert_eq!(second.to_string(), "2017-07-26T10:00:00Z");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn grammar_violations() {
        let cases = [
            r#""17-07-25""#,
            r#""2017-7-25""#,
            r#""2017/07/25""#,
            r#""2017-07-25T1:00:00""#,
            r#""2017-07-25T10-00-00""#,
            r#""2017-07-25T10:00""#,
            r#""2017-07-25Z""#,
            r#""2017-07-25T10:00:00.Z""#,
            r#""2017-07-25T10:00:00+0300""#,
            r#""2017-13-01""#,
            r#""2017-02-30""#,
            r#""2017-07-25T24:00:00""#,
            r#""2017-07-25T10:00:00+24:00""#,
            r#""9999-12-31T23:59:59.9999Z""#,
            r#""0000-01-01T00:00:00+01:00""#,
        ];

        for text in cases {
            let err = parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDateTime, "{text}");
        }
    }

    #[test]
    fn truncated_input() {
        let err = parse(r#""2017-07"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);

        let err = parse(r#""2017-07-25T10:00:00Z"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn error_points_into_literal() {
        let err = parse(r#"  "2017-07-2x""#).unwrap_err();
        assert_eq!(err.position(), 12);
        assert_eq!(err.excerpt(), "x\"");
    }

    #[test]
    fn offset_with_fraction() {
        let dt = parse(r#""2017-07-25T12:00:00.25+00:00""#).unwrap();
        assert_eq!(dt.kind(), DateTimeKind::Local);
        assert_eq!(dt.millisecond(), 250);

        let utc = naive(2017, 7, 25, 12, 0, 0, 250);
        let shift = dt.naive() - utc;
        assert_eq!(shift.num_milliseconds() % (15 * 60 * 1000), 0);
        assert!(shift.abs() <= TimeDelta::hours(14));
    }
}
