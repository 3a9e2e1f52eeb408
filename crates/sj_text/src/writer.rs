use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write as _;

use crate::string::escape_of;
use crate::{DateTime, JsonUnit};

// -----------------------------------------------------------------------------
// JsonBuffer

/// A growable, append-only JSON output buffer.
///
/// All numeric output is locale independent. Floats are written in their
/// shortest round-trip form, using an exponent only when the magnitude is
/// at least `1e16` or below `1e-5`.
///
/// # Examples
///
/// ```
/// use sj_text::JsonBuffer;
///
/// let mut out = JsonBuffer::<u16>::new();
/// out.push_ascii(b'[');
/// out.append_f64(0.5);
/// out.push_ascii(b',');
/// out.append_f64(1e21);
/// out.push_ascii(b',');
/// out.append_quoted("a\"b");
/// out.push_ascii(b']');
///
/// assert_eq!(String::from_utf16(out.as_slice()).unwrap(), r#"[0.5,1e21,"a\"b"]"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonBuffer<U: JsonUnit> {
    buf: Vec<U>,
}

impl<U: JsonUnit> JsonBuffer<U> {
    #[inline]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of units written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[U] {
        &self.buf
    }

    #[inline]
    pub fn into_inner(self) -> Vec<U> {
        self.buf
    }

    /// Appends one ASCII byte, typically a structural token.
    #[inline]
    pub fn push_ascii(&mut self, byte: u8) {
        debug_assert!(byte.is_ascii());
        self.buf.push(U::from_ascii(byte));
    }

    /// Appends ASCII text as is.
    #[inline]
    pub fn append_ascii(&mut self, text: &str) {
        debug_assert!(text.is_ascii());
        self.buf.extend(text.bytes().map(U::from_ascii));
    }

    /// Appends text as is, without quotes or escaping.
    #[inline]
    pub fn append_str(&mut self, text: &str) {
        U::push_str(&mut self.buf, text);
    }

    /// Appends `text` with JSON escapes applied, without quotes.
    pub fn append_escaped(&mut self, text: &str) {
        let mut run = 0;
        for (i, byte) in text.bytes().enumerate() {
            if let Some(escape) = escape_of(byte) {
                U::push_str(&mut self.buf, &text[run..i]);
                self.append_ascii(escape);
                run = i + 1;
            }
        }
        U::push_str(&mut self.buf, &text[run..]);
    }

    /// Appends `text` as a quoted, escaped JSON string.
    #[inline]
    pub fn append_quoted(&mut self, text: &str) {
        self.push_ascii(b'"');
        self.append_escaped(text);
        self.push_ascii(b'"');
    }

    #[inline]
    pub fn append_null(&mut self) {
        self.append_ascii("null");
    }

    #[inline]
    pub fn append_bool(&mut self, value: bool) {
        self.append_ascii(if value { "true" } else { "false" });
    }

    #[inline]
    pub fn append_i64(&mut self, value: i64) {
        let _ = write!(self, "{value}");
    }

    #[inline]
    pub fn append_u64(&mut self, value: u64) {
        let _ = write!(self, "{value}");
    }

    /// Appends a float, or `null` if it is not finite.
    pub fn append_f64(&mut self, value: f64) {
        if !value.is_finite() {
            return self.append_null();
        }

        let magnitude = value.abs();
        if magnitude == 0.0 || (1e-5..1e16).contains(&magnitude) {
            let _ = write!(self, "{value}");
        } else {
            let _ = write!(self, "{value:e}");
        }
    }

    /// Appends a float, or `null` if it is not finite.
    ///
    /// Uses the shortest form that round-trips through `f32`.
    pub fn append_f32(&mut self, value: f32) {
        if !value.is_finite() {
            return self.append_null();
        }

        let magnitude = value.abs();
        if magnitude == 0.0 || (1e-5..1e16).contains(&magnitude) {
            let _ = write!(self, "{value}");
        } else {
            let _ = write!(self, "{value:e}");
        }
    }
}

impl<U: JsonUnit> fmt::Write for JsonBuffer<U> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        U::push_str(&mut self.buf, s);
        Ok(())
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        U::push_char(&mut self.buf, c);
        Ok(())
    }
}

impl<U: JsonUnit> From<JsonBuffer<U>> for Vec<U> {
    #[inline]
    fn from(value: JsonBuffer<U>) -> Self {
        value.buf
    }
}

// -----------------------------------------------------------------------------
// JsonWriter

/// An object-safe view of a [`JsonBuffer`] of either unit type.
///
/// Custom converters write through this trait so that one converter serves
/// both buffer kinds. A converter writes exactly one JSON value.
pub trait JsonWriter {
    /// Number of units written so far.
    fn len(&self) -> usize;

    /// Appends text as is. The caller is responsible for it being valid JSON.
    fn write_raw(&mut self, text: &str);

    fn write_null(&mut self);

    fn write_bool(&mut self, value: bool);

    fn write_i64(&mut self, value: i64);

    fn write_u64(&mut self, value: u64);

    /// Writes a float, or `null` if it is not finite.
    fn write_f64(&mut self, value: f64);

    /// Writes a quoted, escaped string.
    fn write_string(&mut self, value: &str);

    /// Writes a quoted ISO-8601 date-time.
    fn write_date_time(&mut self, value: &DateTime);
}

impl<U: JsonUnit> JsonWriter for JsonBuffer<U> {
    #[inline]
    fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn write_raw(&mut self, text: &str) {
        self.append_str(text);
    }

    #[inline]
    fn write_null(&mut self) {
        self.append_null();
    }

    #[inline]
    fn write_bool(&mut self, value: bool) {
        self.append_bool(value);
    }

    #[inline]
    fn write_i64(&mut self, value: i64) {
        self.append_i64(value);
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.append_u64(value);
    }

    #[inline]
    fn write_f64(&mut self, value: f64) {
        self.append_f64(value);
    }

    #[inline]
    fn write_string(&mut self, value: &str) {
        self.append_quoted(value);
    }

    #[inline]
    fn write_date_time(&mut self, value: &DateTime) {
        self.append_date_time(value);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{JsonBuffer, JsonWriter};

    fn utf8(f: impl FnOnce(&mut JsonBuffer<u8>)) -> String {
        let mut out = JsonBuffer::new();
        f(&mut out);
        String::from_utf8(out.into_inner()).unwrap()
    }

    fn utf16(f: impl FnOnce(&mut JsonBuffer<u16>)) -> String {
        let mut out = JsonBuffer::new();
        f(&mut out);
        String::from_utf16(out.as_slice()).unwrap()
    }

    #[test]
    fn escaping() {
        let text = "q\"b\\/\u{8}\u{c}\n\r\t\u{1}é😀";
        let expected = r#""q\"b\\/\b\f\n\r\t\u0001é😀""#;

        assert_eq!(utf8(|out| out.append_quoted(text)), expected);
        assert_eq!(utf16(|out| out.append_quoted(text)), expected);
    }

    #[test]
    fn escaped_output_is_valid_json() {
        let text = "line\nbreak \"quoted\" \u{1f} tail";
        let json = utf8(|out| out.append_quoted(text));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, serde_json::Value::String(text.into()));
    }

    #[test]
    fn integers() {
        let json = utf16(|out| {
            out.append_i64(i64::MIN);
            out.push_ascii(b' ');
            out.append_u64(u64::MAX);
            out.push_ascii(b' ');
            out.append_i64(0);
        });
        assert_eq!(json, "-9223372036854775808 18446744073709551615 0");
    }

    #[test]
    fn floats() {
        let cases: [(f64, &str); 9] = [
            (0.0, "0"),
            (1.0, "1"),
            (-2.5, "-2.5"),
            (0.1, "0.1"),
            (1e-5, "0.00001"),
            (1e-7, "1e-7"),
            (123456789012345.0, "123456789012345"),
            (1e16, "1e16"),
            (f64::NAN, "null"),
        ];

        for (value, expected) in cases {
            assert_eq!(utf8(|out| out.append_f64(value)), expected);
        }

        assert_eq!(utf8(|out| out.append_f32(0.1)), "0.1");
        assert_eq!(utf8(|out| out.append_f32(f32::INFINITY)), "null");
    }

    #[test]
    fn floats_round_trip() {
        for value in [core::f64::consts::PI, -1.0e300, 5e-324, 0.3] {
            let json = utf8(|out| out.append_f64(value));
            let parsed: f64 = json.parse().unwrap();
            assert_eq!(parsed, value, "{json}");
        }
    }

    #[test]
    fn writer_is_object_safe() {
        let mut bytes = JsonBuffer::<u8>::new();
        let mut units = JsonBuffer::<u16>::new();

        let writers: [&mut dyn JsonWriter; 2] = [&mut bytes, &mut units];
        for writer in writers {
            writer.write_raw("[");
            writer.write_bool(true);
            writer.write_raw(",");
            writer.write_string("x");
            writer.write_raw("]");
            assert_eq!(writer.len(), 10);
        }

        let units: Vec<u8> = units.as_slice().iter().map(|&u| u as u8).collect();
        assert_eq!(bytes.as_slice(), units.as_slice());
    }
}
