use alloc::string::String;
use core::any::Any;

use sj_text::{Cursor, DateTime, ErrorKind, JsonBuffer, JsonError, JsonUnit};
use uuid::Uuid;

use crate::cast::{cast_mut, cast_ref};
use crate::info::PrimitiveKind;

// -----------------------------------------------------------------------------
// Primitive

pub(super) fn encode_primitive<U: JsonUnit>(
    kind: PrimitiveKind,
    value: &dyn Any,
    out: &mut JsonBuffer<U>,
) {
    match kind {
        PrimitiveKind::Bool => out.append_bool(*cast_ref::<bool>(value)),
        PrimitiveKind::I8 => out.append_i64((*cast_ref::<i8>(value)).into()),
        PrimitiveKind::I16 => out.append_i64((*cast_ref::<i16>(value)).into()),
        PrimitiveKind::I32 => out.append_i64((*cast_ref::<i32>(value)).into()),
        PrimitiveKind::I64 => out.append_i64(*cast_ref::<i64>(value)),
        PrimitiveKind::U8 => out.append_u64((*cast_ref::<u8>(value)).into()),
        PrimitiveKind::U16 => out.append_u64((*cast_ref::<u16>(value)).into()),
        PrimitiveKind::U32 => out.append_u64((*cast_ref::<u32>(value)).into()),
        PrimitiveKind::U64 => out.append_u64(*cast_ref::<u64>(value)),
        PrimitiveKind::F32 => out.append_f32(*cast_ref::<f32>(value)),
        PrimitiveKind::F64 => out.append_f64(*cast_ref::<f64>(value)),
        PrimitiveKind::Char => {
            let mut buf = [0_u8; 4];
            out.append_quoted(cast_ref::<char>(value).encode_utf8(&mut buf));
        }
    }
}

pub(super) fn decode_primitive<U: JsonUnit>(
    kind: PrimitiveKind,
    cursor: &mut Cursor<'_, U>,
    value: &mut dyn Any,
) -> Result<(), JsonError> {
    match kind {
        PrimitiveKind::Bool => *cast_mut::<bool>(value) = read_bool(cursor)?,
        PrimitiveKind::I8 => *cast_mut::<i8>(value) = cursor.parse_number()?,
        PrimitiveKind::I16 => *cast_mut::<i16>(value) = cursor.parse_number()?,
        PrimitiveKind::I32 => *cast_mut::<i32>(value) = cursor.parse_number()?,
        PrimitiveKind::I64 => *cast_mut::<i64>(value) = cursor.parse_number()?,
        PrimitiveKind::U8 => *cast_mut::<u8>(value) = cursor.parse_number()?,
        PrimitiveKind::U16 => *cast_mut::<u16>(value) = cursor.parse_number()?,
        PrimitiveKind::U32 => *cast_mut::<u32>(value) = cursor.parse_number()?,
        PrimitiveKind::U64 => *cast_mut::<u64>(value) = cursor.parse_number()?,
        PrimitiveKind::F32 => *cast_mut::<f32>(value) = cursor.parse_number()?,
        PrimitiveKind::F64 => *cast_mut::<f64>(value) = cursor.parse_number()?,
        PrimitiveKind::Char => *cast_mut::<char>(value) = read_char(cursor)?,
    }
    Ok(())
}

fn read_bool<U: JsonUnit>(cursor: &mut Cursor<'_, U>) -> Result<bool, JsonError> {
    cursor.skip_whitespace();
    if cursor.match_literal("true") {
        Ok(true)
    } else if cursor.match_literal("false") {
        Ok(false)
    } else if cursor.is_at_end() {
        Err(cursor.error_here(ErrorKind::UnexpectedEndOfInput, "expected `true` or `false`"))
    } else {
        Err(cursor.error_here(ErrorKind::MalformedJson, "expected `true` or `false`"))
    }
}

fn read_char<U: JsonUnit>(cursor: &mut Cursor<'_, U>) -> Result<char, JsonError> {
    cursor.skip_whitespace();
    let start = cursor.position();
    let text = cursor.read_string()?;

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(JsonError::at(
            ErrorKind::MalformedJson,
            cursor.input(),
            start,
            "expected a one-character string",
        )),
    }
}

// -----------------------------------------------------------------------------
// String

#[inline]
pub(super) fn encode_string<U: JsonUnit>(value: &dyn Any, out: &mut JsonBuffer<U>) {
    out.append_quoted(cast_ref::<String>(value));
}

/// `null` is rejected here, only an `Option<String>` accepts it.
#[inline]
pub(super) fn decode_string<U: JsonUnit>(
    cursor: &mut Cursor<'_, U>,
    value: &mut dyn Any,
) -> Result<(), JsonError> {
    *cast_mut::<String>(value) = cursor.read_string()?;
    Ok(())
}

// -----------------------------------------------------------------------------
// DateTime

#[inline]
pub(super) fn encode_date_time<U: JsonUnit>(value: &dyn Any, out: &mut JsonBuffer<U>) {
    out.append_date_time(cast_ref::<DateTime>(value));
}

#[inline]
pub(super) fn decode_date_time<U: JsonUnit>(
    cursor: &mut Cursor<'_, U>,
    value: &mut dyn Any,
) -> Result<(), JsonError> {
    *cast_mut::<DateTime>(value) = cursor.read_date_time()?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Guid

/// Writes the lowercase hyphenated form, `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
pub(super) fn encode_guid<U: JsonUnit>(value: &dyn Any, out: &mut JsonBuffer<U>) {
    let mut buf = Uuid::encode_buffer();
    let text = cast_ref::<Uuid>(value).hyphenated().encode_lower(&mut buf);
    out.append_quoted(text);
}

/// Accepts every form [`Uuid::parse_str`] does, in either case.
pub(super) fn decode_guid<U: JsonUnit>(
    cursor: &mut Cursor<'_, U>,
    value: &mut dyn Any,
) -> Result<(), JsonError> {
    cursor.skip_whitespace();
    let start = cursor.position();
    let text = cursor.read_string()?;

    *cast_mut::<Uuid>(value) = Uuid::parse_str(&text).map_err(|_| {
        JsonError::at(
            ErrorKind::MalformedJson,
            cursor.input(),
            start,
            "invalid GUID",
        )
    })?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use sj_text::{Cursor, ErrorKind, JsonBuffer};
    use uuid::Uuid;

    use super::{decode_guid, decode_primitive, encode_guid, encode_primitive};
    use crate::info::PrimitiveKind;

    fn utf16(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[test]
    fn primitives_use_the_shortest_form() {
        let mut out = JsonBuffer::<u8>::new();
        encode_primitive(PrimitiveKind::I16, &-32768_i16, &mut out);
        out.push_ascii(b',');
        encode_primitive(PrimitiveKind::U64, &u64::MAX, &mut out);
        out.push_ascii(b',');
        encode_primitive(PrimitiveKind::Bool, &true, &mut out);
        out.push_ascii(b',');
        encode_primitive(PrimitiveKind::Char, &'\n', &mut out);
        out.push_ascii(b',');
        encode_primitive(PrimitiveKind::F64, &f64::NAN, &mut out);

        assert_eq!(out.as_slice(), br#"-32768,18446744073709551615,true,"\n",null"#);
    }

    #[test]
    fn byte_bounds() {
        let input = utf16("0, 255, 256, -1");
        let mut cursor = Cursor::new(&input);
        let mut value = 7_u8;

        decode_primitive(PrimitiveKind::U8, &mut cursor, &mut value).unwrap();
        assert_eq!(value, 0);

        cursor.expect(b',').unwrap();
        decode_primitive(PrimitiveKind::U8, &mut cursor, &mut value).unwrap();
        assert_eq!(value, 255);

        cursor.expect(b',').unwrap();
        let err = decode_primitive(PrimitiveKind::U8, &mut cursor, &mut value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumber);
        assert_eq!(value, 255);

        cursor.expect(b',').unwrap();
        let err = decode_primitive(PrimitiveKind::U8, &mut cursor, &mut value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumber);
    }

    #[test]
    fn bool_and_char_reject_other_tokens() {
        let mut flag = false;
        let err = decode_primitive(PrimitiveKind::Bool, &mut Cursor::new(b"null"), &mut flag)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);

        let err = decode_primitive(PrimitiveKind::Bool, &mut Cursor::new(b" "), &mut flag)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);

        let mut c = ' ';
        let input = utf16(" \"\u{e9}\"");
        decode_primitive(PrimitiveKind::Char, &mut Cursor::new(&input), &mut c).unwrap();
        assert_eq!(c, '\u{e9}');

        let err = decode_primitive(PrimitiveKind::Char, &mut Cursor::new(br#""ab""#), &mut c)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn guid_is_lowercase_hyphenated() {
        let guid = Uuid::from_u128(0x00000001_0002_0003_0405_060708090a0b);
        let mut out = JsonBuffer::<u16>::new();
        encode_guid(&guid, &mut out);
        assert_eq!(
            String::from_utf16(out.as_slice()).unwrap(),
            r#""00000001-0002-0003-0405-060708090a0b""#
        );

        let input = utf16(r#""00000001-0002-0003-0405-060708090A0B""#);
        let mut decoded = Uuid::nil();
        decode_guid(&mut Cursor::new(&input), &mut decoded).unwrap();
        assert_eq!(decoded, guid);
    }

    #[test]
    fn invalid_guid_is_malformed() {
        let mut guid = Uuid::nil();
        let err = decode_guid(&mut Cursor::new(br#"  "not-a-guid""#), &mut guid).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
        assert_eq!(err.position(), 2);
    }
}
