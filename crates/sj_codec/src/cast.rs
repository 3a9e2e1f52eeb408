//! Checked downcasts of the erased values that codecs operate on.
//!
//! A failed downcast means a descriptor was wired to the wrong type, which
//! is a programming error, so these panic instead of returning an error.

use core::any::{Any, type_name};

#[cold]
#[inline(never)]
fn type_mismatch(expected: &'static str) -> ! {
    panic!("value passed to a codec is not of type `{expected}`");
}

#[inline]
pub(crate) fn cast_ref<T: Any>(value: &dyn Any) -> &T {
    match value.downcast_ref::<T>() {
        Some(value) => value,
        None => type_mismatch(type_name::<T>()),
    }
}

#[inline]
pub(crate) fn cast_mut<T: Any>(value: &mut dyn Any) -> &mut T {
    match value.downcast_mut::<T>() {
        Some(value) => value,
        None => type_mismatch(type_name::<T>()),
    }
}
