use core::fmt;

use thiserror::Error;

use crate::info::{ListInfo, NullableInfo, ObjectInfo, PrimitiveInfo, Type};

// -----------------------------------------------------------------------------
// TypeKind

/// The kind of a [`TypeInfo`], which decides the codec built for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Nullable,
    String,
    DateTime,
    Guid,
    List,
    Object,
    Opaque,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Primitive => "Primitive",
            Self::Nullable => "Nullable",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::List => "List",
            Self::Object => "Object",
            Self::Opaque => "Opaque",
        })
    }
}

/// Error returned when a [`TypeInfo`] is not of the expected [`TypeKind`].
#[derive(Debug, Error, Clone, Copy)]
#[error("type kind mismatch: expected {expected}, received {received}")]
pub struct TypeKindError {
    pub expected: TypeKind,
    pub received: TypeKind,
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Describes the JSON shape of a type.
///
/// A `TypeInfo` is obtained through [`JsonTyped::type_info`] and consumed by
/// the codec resolver, which builds one codec per distinct type.
///
/// Composite kinds reach their children through function pointers, so that
/// a type can (indirectly) contain itself.
///
/// - `Primitive`: `bool`, integers, floats and `char`.
/// - `Nullable`: `Option<T>`.
/// - `String`, `DateTime` and `Guid`: `String`, [`sj_text::DateTime`] and [`uuid::Uuid`].
/// - `List`: `Vec<T>`.
/// - `Object`: a struct with named properties.
/// - `Opaque`: a type that can only be converted through a custom converter.
///
/// [`JsonTyped::type_info`]: crate::info::JsonTyped::type_info
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Primitive(PrimitiveInfo),
    Nullable(NullableInfo),
    String(Type),
    DateTime(Type),
    Guid(Type),
    List(ListInfo),
    Object(ObjectInfo),
    Opaque(Type),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Converts to the specific type information.
        pub const fn $name(&self) -> Result<&$info, TypeKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(TypeKindError {
                    expected: TypeKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_nullable: Nullable => NullableInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_object: Object => ObjectInfo);

    /// Returns the described [`Type`].
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => info.ty(),
            Self::Nullable(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Object(info) => info.ty(),
            Self::String(ty) | Self::DateTime(ty) | Self::Guid(ty) | Self::Opaque(ty) => ty,
        }
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Nullable(_) => TypeKind::Nullable,
            Self::String(_) => TypeKind::String,
            Self::DateTime(_) => TypeKind::DateTime,
            Self::Guid(_) => TypeKind::Guid,
            Self::List(_) => TypeKind::List,
            Self::Object(_) => TypeKind::Object,
            Self::Opaque(_) => TypeKind::Opaque,
        }
    }

    #[inline]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }
}
