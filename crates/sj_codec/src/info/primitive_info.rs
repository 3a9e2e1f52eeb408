use core::fmt;

use crate::info::Type;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The built-in scalar types with a direct JSON form.
///
/// `Char` is written as a one-character string, the others as JSON
/// numbers or `true`/`false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
        })
    }
}

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// Type information of a primitive.
///
/// # Examples
///
/// ```
/// use sj_codec::info::{JsonTyped, PrimitiveKind};
///
/// let info = u8::type_info();
/// assert_eq!(info.as_primitive().unwrap().kind(), PrimitiveKind::U8);
/// ```
#[derive(Debug, Clone)]
pub struct PrimitiveInfo {
    ty: Type,
    kind: PrimitiveKind,
}

impl PrimitiveInfo {
    #[inline]
    pub(crate) fn new(ty: Type, kind: PrimitiveKind) -> Self {
        Self { ty, kind }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}
