//! Type descriptors: the JSON shape of a Rust type.
//!
//! ## Menu
//!
//! - [`JsonTyped`]: the static accessor to a type's [`TypeInfo`].
//! - [`TypeInfo`]: one of [`PrimitiveInfo`], [`NullableInfo`], [`ListInfo`],
//!   [`ObjectInfo`] or a leaf kind (string, date-time, GUID, opaque).
//! - [`PropertyInfo`] and the [`property!`](crate::property) macro: named members of an object.
//! - [`JsonObject`]: lifecycle hooks of an object decode.

// -----------------------------------------------------------------------------
// Modules

mod list_info;
mod nullable_info;
mod object_info;
mod primitive_info;
mod ty;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use list_info::ListInfo;
pub use nullable_info::NullableInfo;
pub use object_info::{JsonObject, ObjectInfo, PropertyInfo};
pub use primitive_info::{PrimitiveInfo, PrimitiveKind};
pub use ty::Type;
pub use type_info::{TypeInfo, TypeKind, TypeKindError};
pub use typed::JsonTyped;

pub(crate) use list_info::ListOps;
pub(crate) use nullable_info::NullableOps;
