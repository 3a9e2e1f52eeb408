use alloc::string::String;

use crate::{ErrorKind, JsonError, JsonUnit};

// -----------------------------------------------------------------------------
// Unescape

/// Resolves the escape sequences of a raw string span.
///
/// Supports `\" \\ \/ \b \f \n \r \t` and `\uXXXX`. A UTF-16 surrogate pair
/// written as two `\u` escapes is combined into one character.
///
/// # Errors
///
/// - [`ErrorKind::InvalidEscape`] for an unknown escape, malformed hex digits
///   or an unpaired surrogate.
/// - [`ErrorKind::MalformedJson`] if the span is not valid in its encoding.
///
/// # Examples
///
/// ```
/// use sj_text::unescape;
///
/// let raw: Vec<u16> = r#"tab\there \ud83d\ude00"#.encode_utf16().collect();
/// assert_eq!(unescape(&raw).unwrap(), "tab\there \u{1F600}");
///
/// assert!(unescape(br#"\x"#).is_err());
/// ```
pub fn unescape<U: JsonUnit>(raw: &[U]) -> Result<String, JsonError> {
    unescape_span(raw, 0, raw.len())
}

/// Unescapes `input[start..end]`, reporting errors against the whole input.
pub(crate) fn unescape_span<U: JsonUnit>(
    input: &[U],
    start: usize,
    end: usize,
) -> Result<String, JsonError> {
    let mut out = String::with_capacity(end - start);
    let mut run = start;
    let mut pos = start;

    while pos < end {
        if !input[pos].is(b'\\') {
            pos += 1;
            continue;
        }

        decode_run(input, run, pos, &mut out)?;
        pos = unescape_one(input, pos, end, &mut out)?;
        run = pos;
    }

    decode_run(input, run, end, &mut out)?;
    Ok(out)
}

#[inline]
fn decode_run<U: JsonUnit>(
    input: &[U],
    start: usize,
    end: usize,
    out: &mut String,
) -> Result<(), JsonError> {
    if start == end || U::decode_into(&input[start..end], out) {
        Ok(())
    } else {
        Err(JsonError::at(
            ErrorKind::MalformedJson,
            input,
            start,
            "string is not valid text",
        ))
    }
}

/// Resolves the escape at `pos` and returns the position after it.
fn unescape_one<U: JsonUnit>(
    input: &[U],
    pos: usize,
    end: usize,
    out: &mut String,
) -> Result<usize, JsonError> {
    let invalid =
        |message: &'static str| JsonError::at(ErrorKind::InvalidEscape, input, pos, message);

    let Some(tag) = input.get(pos + 1).filter(|_| pos + 1 < end) else {
        return Err(invalid("dangling backslash"));
    };

    let c = match tag.to_ascii() {
        Some(b'"') => '"',
        Some(b'\\') => '\\',
        Some(b'/') => '/',
        Some(b'b') => '\u{8}',
        Some(b'f') => '\u{c}',
        Some(b'n') => '\n',
        Some(b'r') => '\r',
        Some(b't') => '\t',
        Some(b'u') => {
            let high = read_hex4(input, pos + 2, end)
                .ok_or_else(|| invalid("malformed `\\u` escape"))?;

            if !(0xD800..0xE000).contains(&high) {
                // Not a surrogate, so always a valid scalar.
                out.push(char::from_u32(high as u32).unwrap_or(char::REPLACEMENT_CHARACTER));
                return Ok(pos + 6);
            }

            if high >= 0xDC00 {
                return Err(invalid("unpaired low surrogate"));
            }

            let next = pos + 6;
            let low = match input.get(next..next + 2) {
                Some([a, b]) if next + 2 <= end && a.is(b'\\') && b.is(b'u') => {
                    read_hex4(input, next + 2, end)
                }
                _ => None,
            };

            return match low {
                Some(low @ 0xDC00..0xE000) => {
                    let code =
                        0x10000 + (((high as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    Ok(next + 6)
                }
                _ => Err(invalid("unpaired high surrogate")),
            };
        }
        _ => return Err(invalid("unknown escape")),
    };

    out.push(c);
    Ok(pos + 2)
}

fn read_hex4<U: JsonUnit>(input: &[U], start: usize, end: usize) -> Option<u16> {
    if start + 4 > end {
        return None;
    }

    input[start..start + 4].iter().try_fold(0_u16, |acc, unit| {
        let digit = (unit.to_ascii()? as char).to_digit(16)?;
        Some((acc << 4) | digit as u16)
    })
}

// -----------------------------------------------------------------------------
// Escape

/// Returns the escape sequence for `byte`, or `None` if it is written as is.
///
/// Only ASCII needs escaping, so a UTF-8 string can be scanned bytewise.
#[inline]
pub(crate) fn escape_of(byte: u8) -> Option<&'static str> {
    const CONTROL: [&str; 32] = [
        "\\u0000", "\\u0001", "\\u0002", "\\u0003", "\\u0004", "\\u0005", "\\u0006", "\\u0007",
        "\\b", "\\t", "\\n", "\\u000b", "\\f", "\\r", "\\u000e", "\\u000f", "\\u0010", "\\u0011",
        "\\u0012", "\\u0013", "\\u0014", "\\u0015", "\\u0016", "\\u0017", "\\u0018", "\\u0019",
        "\\u001a", "\\u001b", "\\u001c", "\\u001d", "\\u001e", "\\u001f",
    ];

    match byte {
        b'"' => Some("\\\""),
        b'\\' => Some("\\\\"),
        0..0x20 => Some(CONTROL[byte as usize]),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Tests
