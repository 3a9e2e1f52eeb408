//! [`JsonTyped`] for the built-in types.

use alloc::string::String;
use alloc::vec::Vec;

use sj_text::DateTime;
use uuid::Uuid;

use crate::info::{JsonTyped, ListInfo, NullableInfo, PrimitiveInfo, PrimitiveKind, Type, TypeInfo};

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl JsonTyped for $ty {
                #[inline]
                fn type_info() -> TypeInfo {
                    TypeInfo::Primitive(PrimitiveInfo::new(Type::of::<$ty>(), PrimitiveKind::$kind))
                }
            }
        )*
    };
}

impl_primitive!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
);

impl JsonTyped for String {
    #[inline]
    fn type_info() -> TypeInfo {
        TypeInfo::String(Type::of::<Self>())
    }
}

impl JsonTyped for DateTime {
    #[inline]
    fn type_info() -> TypeInfo {
        TypeInfo::DateTime(Type::of::<Self>())
    }
}

impl JsonTyped for Uuid {
    #[inline]
    fn type_info() -> TypeInfo {
        TypeInfo::Guid(Type::of::<Self>())
    }
}

impl<T: JsonTyped + Default> JsonTyped for Option<T> {
    #[inline]
    fn type_info() -> TypeInfo {
        TypeInfo::Nullable(NullableInfo::new::<T>())
    }
}

impl<T: JsonTyped + Default> JsonTyped for Vec<T> {
    #[inline]
    fn type_info() -> TypeInfo {
        TypeInfo::List(ListInfo::new::<T>())
    }
}

// -----------------------------------------------------------------------------
// Tests
