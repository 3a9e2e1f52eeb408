//! Runs the codecs of a [`CodecTable`] over erased values.
//!
//! Both directions are generic over the [`JsonUnit`], so the UTF-16 and
//! UTF-8 paths share every line of codec logic.

use core::any::Any;

use sj_text::{Cursor, JsonBuffer, JsonError, JsonUnit};

use crate::info::Type;
use crate::resolve::{Codec, CodecId, CodecTable};

// -----------------------------------------------------------------------------
// Modules

mod leaf;
mod list;
mod object;

// -----------------------------------------------------------------------------
// Dispatch

/// Writes `value` with the codec `id`.
///
/// Built-in codecs never fail, only custom converters can.
pub(crate) fn encode<U: JsonUnit>(
    table: &CodecTable,
    id: CodecId,
    value: &dyn Any,
    out: &mut JsonBuffer<U>,
) -> Result<(), JsonError> {
    let entry = table.entry(id);

    match &entry.codec {
        Codec::Primitive(kind) => leaf::encode_primitive(*kind, value, out),
        Codec::String => leaf::encode_string(value, out),
        Codec::DateTime => leaf::encode_date_time(value, out),
        Codec::Guid => leaf::encode_guid(value, out),
        Codec::Nullable { inner, ops } => match (ops.get)(value) {
            Some(inner_value) => return encode(table, *inner, inner_value, out),
            None => out.append_null(),
        },
        Codec::List { item, ops } => return list::encode(table, *item, *ops, value, out),
        Codec::Object {
            info, properties, ..
        } => return object::encode(table, info, properties, value, out),
        Codec::Custom { converter, .. } => {
            return converter
                .to_json(out, value)
                .map_err(|err| err.in_type(entry.ty.path()));
        }
        Codec::Pending => unresolved(&entry.ty),
    }
    Ok(())
}

/// Reads one value with the codec `id` into `value`.
///
/// The target is updated in place. Errors carry the path of every type
/// being decoded when they were raised.
pub(crate) fn decode<U: JsonUnit>(
    table: &CodecTable,
    id: CodecId,
    cursor: &mut Cursor<'_, U>,
    value: &mut dyn Any,
) -> Result<(), JsonError> {
    let entry = table.entry(id);

    let result = match &entry.codec {
        Codec::Primitive(kind) => leaf::decode_primitive(*kind, cursor, value),
        Codec::String => leaf::decode_string(cursor, value),
        Codec::DateTime => leaf::decode_date_time(cursor, value),
        Codec::Guid => leaf::decode_guid(cursor, value),
        Codec::Nullable { inner, ops } => {
            cursor.skip_whitespace();
            if cursor.match_literal("null") {
                (ops.set_none)(value);
                Ok(())
            } else {
                decode(table, *inner, cursor, (ops.get_or_insert_default)(value))
            }
        }
        Codec::List { item, ops } => list::decode(table, *item, *ops, cursor, value),
        Codec::Object {
            info,
            properties,
            nullable,
        } => object::decode(table, info, properties, nullable, cursor, value),
        Codec::Custom { converter, .. } => converter.from_json(cursor, value),
        Codec::Pending => unresolved(&entry.ty),
    };

    result.map_err(|err| err.in_type(entry.ty.path()))
}

#[cold]
#[inline(never)]
fn unresolved(ty: &Type) -> ! {
    panic!("codec of `{ty}` was used before its resolution finished");
}
