use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

// -----------------------------------------------------------------------------
// JsonUnit

/// A code unit of a JSON buffer.
///
/// Implemented for `u8` (UTF-8 bytes) and `u16` (UTF-16 text units) only.
///
/// JSON structure is pure ASCII, so the scanner only ever needs to know
/// whether a unit is a given ASCII byte. Text content is converted as whole
/// runs through [`decode_into`](JsonUnit::decode_into) and
/// [`push_str`](JsonUnit::push_str).
///
/// # Examples
///
/// ```
/// use sj_text::JsonUnit;
///
/// assert_eq!(<u16 as JsonUnit>::from_ascii(b'{'), 0x7B_u16);
/// assert_eq!(0x00E9_u16.to_ascii(), None);
///
/// let mut out = Vec::<u16>::new();
/// u16::push_str(&mut out, "é");
/// assert_eq!(out, [0x00E9]);
/// ```
pub trait JsonUnit: sealed::Sealed + Copy + Eq + Debug + Send + Sync + 'static {
    /// Name of the buffer representation, for diagnostics.
    const NAME: &'static str;

    /// Converts an ASCII byte to a unit.
    fn from_ascii(byte: u8) -> Self;

    /// Returns the ASCII byte this unit encodes, or `None` for any other unit.
    fn to_ascii(self) -> Option<u8>;

    /// Appends the encoding of `s` to `out`.
    fn push_str(out: &mut Vec<Self>, s: &str);

    /// Appends the encoding of `c` to `out`.
    fn push_char(out: &mut Vec<Self>, c: char);

    /// Decodes `units` and appends the text to `out`.
    ///
    /// Returns `false` if the units are not valid in this encoding,
    /// in which case `out` may hold a partial result.
    fn decode_into(units: &[Self], out: &mut String) -> bool;

    /// Decodes `units`, replacing invalid sequences with `U+FFFD`.
    fn decode_lossy(units: &[Self]) -> String;

    /// Returns `true` if `units` is exactly the encoding of `s`.
    fn eq_str(units: &[Self], s: &str) -> bool;

    /// Returns `true` if this unit is the ASCII byte `byte`.
    #[inline(always)]
    fn is(self, byte: u8) -> bool {
        self.to_ascii() == Some(byte)
    }
}

impl JsonUnit for u8 {
    const NAME: &'static str = "utf-8";

    #[inline(always)]
    fn from_ascii(byte: u8) -> Self {
        byte
    }

    #[inline(always)]
    fn to_ascii(self) -> Option<u8> {
        if self.is_ascii() { Some(self) } else { None }
    }

    #[inline]
    fn push_str(out: &mut Vec<Self>, s: &str) {
        out.extend_from_slice(s.as_bytes());
    }

    #[inline]
    fn push_char(out: &mut Vec<Self>, c: char) {
        let mut buf = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    fn decode_into(units: &[Self], out: &mut String) -> bool {
        match core::str::from_utf8(units) {
            Ok(s) => {
                out.push_str(s);
                true
            }
            Err(_) => false,
        }
    }

    fn decode_lossy(units: &[Self]) -> String {
        String::from_utf8_lossy(units).into_owned()
    }

    #[inline]
    fn eq_str(units: &[Self], s: &str) -> bool {
        units == s.as_bytes()
    }
}

impl JsonUnit for u16 {
    const NAME: &'static str = "utf-16";

    #[inline(always)]
    fn from_ascii(byte: u8) -> Self {
        byte as u16
    }

    #[inline(always)]
    fn to_ascii(self) -> Option<u8> {
        if self < 0x80 { Some(self as u8) } else { None }
    }

    #[inline]
    fn push_str(out: &mut Vec<Self>, s: &str) {
        out.extend(s.encode_utf16());
    }

    #[inline]
    fn push_char(out: &mut Vec<Self>, c: char) {
        let mut buf = [0u16; 2];
        out.extend_from_slice(c.encode_utf16(&mut buf));
    }

    fn decode_into(units: &[Self], out: &mut String) -> bool {
        out.reserve(units.len());
        for c in char::decode_utf16(units.iter().copied()) {
            match c {
                Ok(c) => out.push(c),
                Err(_) => return false,
            }
        }
        true
    }

    fn decode_lossy(units: &[Self]) -> String {
        String::from_utf16_lossy(units)
    }

    #[inline]
    fn eq_str(units: &[Self], s: &str) -> bool {
        units.iter().copied().eq(s.encode_utf16())
    }
}

// -----------------------------------------------------------------------------
// Tests
