use alloc::string::String;

use crate::{Cursor, DateTime, ErrorKind, JsonError, JsonUnit};

// -----------------------------------------------------------------------------
// JsonReader

/// An object-safe view of a [`Cursor`] of either unit type.
///
/// Custom converters read through this trait so that one converter serves
/// both buffer kinds. A converter must consume exactly one JSON value and
/// leave the reader right after it.
///
/// Value-level reads skip leading whitespace, token-level ones do not.
///
/// # Examples
///
/// ```
/// use sj_text::{Cursor, JsonReader};
///
/// fn read_pair(reader: &mut dyn JsonReader) -> Result<(i64, String), sj_text::JsonError> {
///     reader.skip_whitespace();
///     reader.expect(b'[')?;
///     let n = reader.read_i64()?;
///     reader.skip_whitespace();
///     reader.expect(b',')?;
///     let s = reader.read_string()?;
///     reader.skip_whitespace();
///     reader.expect(b']')?;
///     Ok((n, s))
/// }
///
/// let text: Vec<u16> = r#"[ 7, "seven" ]"#.encode_utf16().collect();
/// assert_eq!(read_pair(&mut Cursor::new(&text)).unwrap(), (7, "seven".into()));
/// assert_eq!(read_pair(&mut Cursor::new(br#"[7,"seven"]"#)).unwrap(), (7, "seven".into()));
/// ```
pub trait JsonReader {
    /// Offset from the start of the top-level input.
    fn position(&self) -> usize;

    fn is_at_end(&self) -> bool;

    /// Returns the next unit as an ASCII byte without consuming it.
    fn peek_byte(&self) -> Option<u8>;

    fn skip_whitespace(&mut self);

    /// Consumes the next unit if it is `byte`.
    fn consume(&mut self, byte: u8) -> bool;

    /// Consumes the structural token `byte` or fails with [`ErrorKind::MalformedJson`].
    fn expect(&mut self, byte: u8) -> Result<(), JsonError>;

    /// Consumes `literal` if the input continues with it.
    fn match_literal(&mut self, literal: &str) -> bool;

    /// Reads a quoted string and resolves its escapes.
    fn read_string(&mut self) -> Result<String, JsonError>;

    fn read_i64(&mut self) -> Result<i64, JsonError>;

    fn read_u64(&mut self) -> Result<u64, JsonError>;

    fn read_f64(&mut self) -> Result<f64, JsonError>;

    /// Reads a quoted ISO-8601 date-time.
    fn read_date_time(&mut self) -> Result<DateTime, JsonError>;

    /// Discards one JSON value.
    fn skip_value(&mut self) -> Result<(), JsonError>;

    /// Creates an error of `kind` at the current position.
    fn error(&self, kind: ErrorKind, message: &'static str) -> JsonError;
}

impl<U: JsonUnit> JsonReader for Cursor<'_, U> {
    #[inline]
    fn position(&self) -> usize {
        Cursor::position(self)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        Cursor::is_at_end(self)
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        Cursor::peek_byte(self)
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        Cursor::skip_whitespace(self);
    }

    #[inline]
    fn consume(&mut self, byte: u8) -> bool {
        Cursor::consume(self, byte)
    }

    #[inline]
    fn expect(&mut self, byte: u8) -> Result<(), JsonError> {
        Cursor::expect(self, byte)
    }

    #[inline]
    fn match_literal(&mut self, literal: &str) -> bool {
        Cursor::match_literal(self, literal)
    }

    #[inline]
    fn read_string(&mut self) -> Result<String, JsonError> {
        Cursor::read_string(self)
    }

    #[inline]
    fn read_i64(&mut self) -> Result<i64, JsonError> {
        self.parse_number()
    }

    #[inline]
    fn read_u64(&mut self) -> Result<u64, JsonError> {
        self.parse_number()
    }

    #[inline]
    fn read_f64(&mut self) -> Result<f64, JsonError> {
        self.parse_number()
    }

    #[inline]
    fn read_date_time(&mut self) -> Result<DateTime, JsonError> {
        Cursor::read_date_time(self)
    }

    #[inline]
    fn skip_value(&mut self) -> Result<(), JsonError> {
        Cursor::skip_value(self)
    }

    #[inline]
    fn error(&self, kind: ErrorKind, message: &'static str) -> JsonError {
        self.error_here(kind, message)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::JsonReader;
    use crate::{Cursor, ErrorKind};

    #[test]
    fn reader_error_keeps_position() {
        let input: Vec<u16> = "  oops".encode_utf16().collect();
        let mut cursor = Cursor::new(&input);
        let reader: &mut dyn JsonReader = &mut cursor;

        reader.skip_whitespace();
        let err = reader.error(ErrorKind::Custom, "rejected");
        assert_eq!(err.position(), 2);
        assert_eq!(err.excerpt(), "oops");
        assert_eq!(err.message(), "rejected");
    }

    #[test]
    fn numbers_through_reader() {
        let mut cursor = Cursor::new(b"-3 18446744073709551615 2.5".as_slice());
        let reader: &mut dyn JsonReader = &mut cursor;

        assert_eq!(reader.read_i64().unwrap(), -3);
        assert_eq!(reader.read_u64().unwrap(), u64::MAX);
        assert_eq!(reader.read_f64().unwrap(), 2.5);
        assert!(reader.is_at_end());
    }
}
