use core::any::Any;
use core::fmt;

use crate::cast::{cast_mut, cast_ref};
use crate::info::{JsonTyped, Type, TypeInfo};

// -----------------------------------------------------------------------------
// NullableOps

/// Erased operations on an `Option<T>`.
#[derive(Clone, Copy)]
pub(crate) struct NullableOps {
    pub get: fn(&dyn Any) -> Option<&dyn Any>,
    pub set_none: fn(&mut dyn Any),
    pub get_or_insert_default: fn(&mut dyn Any) -> &mut dyn Any,
}

impl NullableOps {
    fn of<T: Any + Default>() -> Self {
        fn get<T: Any>(value: &dyn Any) -> Option<&dyn Any> {
            cast_ref::<Option<T>>(value).as_ref().map(|v| v as &dyn Any)
        }

        fn set_none<T: Any>(value: &mut dyn Any) {
            *cast_mut::<Option<T>>(value) = None;
        }

        fn get_or_insert_default<T: Any + Default>(value: &mut dyn Any) -> &mut dyn Any {
            cast_mut::<Option<T>>(value).get_or_insert_with(T::default)
        }

        Self {
            get: get::<T>,
            set_none: set_none::<T>,
            get_or_insert_default: get_or_insert_default::<T>,
        }
    }
}

// -----------------------------------------------------------------------------
// NullableInfo

/// Type information of an `Option<T>`.
///
/// `None` is written as `null`, and `null` decodes to `None`. Decoding any
/// other value into a `None` target first inserts `T::default()`.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use sj_codec::info::JsonTyped;
///
/// let info = <Option<i16>>::type_info();
/// let nullable = info.as_nullable().unwrap();
///
/// assert_eq!(nullable.inner().id(), TypeId::of::<i16>());
/// assert!(nullable.inner_info().as_primitive().is_ok());
/// ```
#[derive(Clone)]
pub struct NullableInfo {
    ty: Type,
    inner: Type,
    // The inner info is built on demand so that cyclic types can be described.
    inner_info: fn() -> TypeInfo,
    ops: NullableOps,
}

impl NullableInfo {
    /// Creates the [`NullableInfo`] of `Option<T>`.
    pub fn new<T: JsonTyped + Default>() -> Self {
        Self {
            ty: Type::of::<Option<T>>(),
            inner: Type::of::<T>(),
            inner_info: T::type_info,
            ops: NullableOps::of::<T>(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// The type wrapped by the `Option`.
    #[inline]
    pub const fn inner(&self) -> &Type {
        &self.inner
    }

    /// Builds the [`TypeInfo`] of the wrapped type.
    #[inline]
    pub fn inner_info(&self) -> TypeInfo {
        (self.inner_info)()
    }

    #[inline]
    pub(crate) const fn ops(&self) -> NullableOps {
        self.ops
    }
}

impl fmt::Debug for NullableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullableInfo")
            .field("ty", &self.ty)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
