use core::any::Any;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// JsonTyped

/// A static accessor to the JSON shape of a type.
///
/// Implemented for the primitives, `String`, [`DateTime`], [`Uuid`],
/// `Option<T>` and `Vec<T>`. Objects implement it by hand, listing their
/// properties in an [`ObjectInfo`]:
///
/// ```
/// use sj_codec::info::{JsonObject, JsonTyped, ObjectInfo, TypeInfo};
/// use sj_codec::property;
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     nickname: Option<String>,
/// }
///
/// impl JsonObject for Person {}
///
/// impl JsonTyped for Person {
///     fn type_info() -> TypeInfo {
///         TypeInfo::Object(ObjectInfo::new::<Self>([
///             property!(Self, "Name" => name),
///             property!(Self, "Nickname" => nickname),
///         ]))
///     }
/// }
/// ```
///
/// A type with only a custom converter returns [`TypeInfo::Opaque`].
///
/// [`DateTime`]: sj_text::DateTime
/// [`Uuid`]: uuid::Uuid
/// [`ObjectInfo`]: crate::info::ObjectInfo
pub trait JsonTyped: Any {
    /// Builds the type information.
    ///
    /// Called once per type by each resolver that meets it.
    fn type_info() -> TypeInfo;
}
