use core::any::Any;

use sj_text::{Cursor, ErrorKind, JsonBuffer, JsonError, JsonUnit};

use crate::info::ListOps;
use crate::resolve::{CodecId, CodecTable};

pub(super) fn encode<U: JsonUnit>(
    table: &CodecTable,
    item: CodecId,
    ops: ListOps,
    value: &dyn Any,
    out: &mut JsonBuffer<U>,
) -> Result<(), JsonError> {
    out.push_ascii(b'[');
    for index in 0..(ops.len)(value) {
        if index > 0 {
            out.push_ascii(b',');
        }
        super::encode(table, item, (ops.item)(value, index), out)?;
    }
    out.push_ascii(b']');
    Ok(())
}

/// Replaces the content of the list with the items of a JSON array.
///
/// The list is cleared only once `[` has been read, so a list is left
/// untouched by input that is not an array at all. Items are decoded into
/// freshly pushed defaults.
pub(super) fn decode<U: JsonUnit>(
    table: &CodecTable,
    item: CodecId,
    ops: ListOps,
    cursor: &mut Cursor<'_, U>,
    value: &mut dyn Any,
) -> Result<(), JsonError> {
    cursor.skip_whitespace();
    cursor.expect(b'[')?;
    (ops.clear)(value);

    cursor.skip_whitespace();
    if cursor.consume(b']') {
        return Ok(());
    }

    loop {
        super::decode(table, item, cursor, (ops.push_default)(value))?;

        cursor.skip_whitespace();
        if !cursor.consume(b',') {
            return cursor.expect(b']');
        }

        cursor.skip_whitespace();
        if cursor.peek_byte() == Some(b']') {
            return Err(cursor.error_here(ErrorKind::MalformedJson, "trailing comma in array"));
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use sj_text::{Cursor, ErrorKind, JsonBuffer};

    use crate::info::JsonTyped;
    use crate::registry::ConverterRegistry;
    use crate::resolve::{CodecResolver, CodecTable};

    fn decode_into(list: &mut Vec<Option<i16>>, input: &str) -> Result<(), sj_text::JsonError> {
        let registry = ConverterRegistry::new();
        let mut table = CodecTable::new();
        let id = CodecResolver::new(&registry, &mut table).resolve(<Vec<Option<i16>>>::type_info());

        let input: Vec<u16> = input.encode_utf16().collect();
        crate::codec::decode(&table, id, &mut Cursor::new(&input), list)
    }

    #[test]
    fn nullable_items() {
        let mut list = vec![Some(9)];
        decode_into(&mut list, " [ -32768, -1,0 ,1,42 , null,32767 ] ").unwrap();
        assert_eq!(
            list,
            [Some(-32768), Some(-1), Some(0), Some(1), Some(42), None, Some(32767)]
        );

        decode_into(&mut list, "[]").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn encode_writes_items_in_order() {
        let registry = ConverterRegistry::new();
        let mut table = CodecTable::new();
        let id = CodecResolver::new(&registry, &mut table).resolve(<Vec<Option<i16>>>::type_info());

        let mut out = JsonBuffer::<u8>::new();
        crate::codec::encode(&table, id, &vec![Some(-1_i16), None, Some(7)], &mut out).unwrap();
        assert_eq!(out.as_slice(), b"[-1,null,7]");
    }

    #[test]
    fn malformed_arrays() {
        let mut list = vec![Some(1)];

        let err = decode_into(&mut list, "null").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
        assert_eq!(list, [Some(1)]);

        let err = decode_into(&mut list, "[1,2,]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
        assert_eq!(err.position(), 5);

        let err = decode_into(&mut list, "[1 2]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);

        let err = decode_into(&mut list, "[1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);
    }
}
