use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::cast::{cast_mut, cast_ref};
use crate::info::{JsonTyped, Type, TypeInfo};

// -----------------------------------------------------------------------------
// ListOps

/// Erased operations on a `Vec<T>`.
#[derive(Clone, Copy)]
pub(crate) struct ListOps {
    pub len: fn(&dyn Any) -> usize,
    pub item: fn(&dyn Any, usize) -> &dyn Any,
    pub clear: fn(&mut dyn Any),
    pub push_default: fn(&mut dyn Any) -> &mut dyn Any,
}

impl ListOps {
    fn of<T: Any + Default>() -> Self {
        fn len<T: Any>(list: &dyn Any) -> usize {
            cast_ref::<Vec<T>>(list).len()
        }

        fn item<T: Any>(list: &dyn Any, index: usize) -> &dyn Any {
            &cast_ref::<Vec<T>>(list)[index]
        }

        fn clear<T: Any>(list: &mut dyn Any) {
            cast_mut::<Vec<T>>(list).clear();
        }

        fn push_default<T: Any + Default>(list: &mut dyn Any) -> &mut dyn Any {
            let list = cast_mut::<Vec<T>>(list);
            list.push(T::default());
            let last = list.len() - 1;
            &mut list[last]
        }

        Self {
            len: len::<T>,
            item: item::<T>,
            clear: clear::<T>,
            push_default: push_default::<T>,
        }
    }
}

// -----------------------------------------------------------------------------
// ListInfo

/// Type information of a `Vec<T>`.
///
/// A list never decodes from `null`, use `Option<Vec<T>>` for that.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use sj_codec::info::JsonTyped;
///
/// let info = <Vec<String>>::type_info();
/// let list = info.as_list().unwrap();
///
/// assert_eq!(list.item().id(), TypeId::of::<String>());
/// ```
#[derive(Clone)]
pub struct ListInfo {
    ty: Type,
    item: Type,
    // Built on demand, see `NullableInfo`.
    item_info: fn() -> TypeInfo,
    ops: ListOps,
}

impl ListInfo {
    /// Creates the [`ListInfo`] of `Vec<T>`.
    pub fn new<T: JsonTyped + Default>() -> Self {
        Self {
            ty: Type::of::<Vec<T>>(),
            item: Type::of::<T>(),
            item_info: T::type_info,
            ops: ListOps::of::<T>(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// The item type.
    #[inline]
    pub const fn item(&self) -> &Type {
        &self.item
    }

    /// Builds the [`TypeInfo`] of list items.
    #[inline]
    pub fn item_info(&self) -> TypeInfo {
        (self.item_info)()
    }

    #[inline]
    pub(crate) const fn ops(&self) -> ListOps {
        self.ops
    }
}

impl fmt::Debug for ListInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListInfo")
            .field("ty", &self.ty)
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}
