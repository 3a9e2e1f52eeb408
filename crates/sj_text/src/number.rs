use alloc::string::String;
use core::str::FromStr;

use crate::{Cursor, ErrorKind, JsonError, JsonUnit};

/// Longest number literal converted without allocating.
const INLINE_LEN: usize = 64;

impl<'a, U: JsonUnit> Cursor<'a, U> {
    /// Scans a number literal and returns its raw span.
    ///
    /// Grammar: `-? int (. digits)? ([eE] [+-]? digits)?` where `int` is `0`
    /// or a digit sequence without a leading zero. Scanning stops at the
    /// first unit that cannot continue the literal.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnexpectedEndOfInput`] if the input ends before the
    /// literal starts. [`ErrorKind::InvalidNumber`] if a sign, decimal point
    /// or exponent marker is not followed by a digit, or if the integer part
    /// has a leading zero.
    pub fn read_number(&mut self) -> Result<&'a [U], JsonError> {
        if self.is_at_end() {
            return Err(self.error_here(ErrorKind::UnexpectedEndOfInput, "expected a number"));
        }
        let start = self.position();

        self.consume(b'-');
        if self.consume(b'0') {
            if let Some(b'0'..=b'9') = self.peek_byte() {
                return Err(self.error_here(ErrorKind::InvalidNumber, "leading zero"));
            }
        } else {
            self.digits("expected a digit")?;
        }

        if self.consume(b'.') {
            self.digits("expected a digit after `.`")?;
        }

        if self.consume(b'e') || self.consume(b'E') {
            let _ = self.consume(b'+') || self.consume(b'-');
            self.digits("expected an exponent")?;
        }

        Ok(&self.input()[start..self.position()])
    }

    /// Reads a number value and converts it to `T`.
    ///
    /// Leading whitespace is skipped.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidNumber`] if the literal is malformed or does not
    /// fit `T`, e.g. a fraction or an out-of-range value for an integer type.
    ///
    /// # Examples
    ///
    /// ```
    /// use sj_text::{Cursor, ErrorKind};
    ///
    /// let mut cursor = Cursor::new(b" 255,256");
    /// assert_eq!(cursor.parse_number::<u8>().unwrap(), 255);
    ///
    /// cursor.expect(b',').unwrap();
    /// let err = cursor.parse_number::<u8>().unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidNumber);
    /// assert_eq!(err.position(), 5);
    /// ```
    pub fn parse_number<T: FromStr>(&mut self) -> Result<T, JsonError> {
        self.skip_whitespace();

        let start = self.position();
        let span = self.read_number()?;

        with_ascii(span, |text| text.parse::<T>().ok()).ok_or_else(|| {
            JsonError::at(
                ErrorKind::InvalidNumber,
                self.input(),
                start,
                "number out of range for the target type",
            )
        })
    }

    fn digits(&mut self, message: &'static str) -> Result<(), JsonError> {
        let start = self.position();
        while let Some(b'0'..=b'9') = self.peek_byte() {
            self.advance(1);
        }

        if self.position() == start {
            return Err(self.error_here(ErrorKind::InvalidNumber, message));
        }
        Ok(())
    }
}

/// Runs `f` over the text of an ASCII span.
///
/// Spans up to 64 units are copied to the stack.
fn with_ascii<U: JsonUnit, R>(span: &[U], f: impl FnOnce(&str) -> Option<R>) -> Option<R> {
    if span.len() <= INLINE_LEN {
        let mut buf = [0_u8; INLINE_LEN];
        for (dst, unit) in buf.iter_mut().zip(span) {
            *dst = unit.to_ascii()?;
        }
        f(core::str::from_utf8(&buf[..span.len()]).ok()?)
    } else {
        let text = span
            .iter()
            .map(|unit| unit.to_ascii().map(char::from))
            .collect::<Option<String>>()?;
        f(&text)
    }
}

// -----------------------------------------------------------------------------
// Tests
