use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use sj_utils::hash::HashMap;

use crate::cast::{cast_mut, cast_ref};
use crate::info::{JsonTyped, Type, TypeInfo};

// -----------------------------------------------------------------------------
// JsonObject

/// Lifecycle hooks of an object decode.
///
/// Both hooks default to doing nothing.
///
/// - [`on_new_object`] runs after `{` is read and before any property is
///   set. By then every `Option` property has already been reset to `None`.
/// - [`on_object_finished`] runs after the closing `}`.
///
/// [`on_new_object`]: JsonObject::on_new_object
/// [`on_object_finished`]: JsonObject::on_object_finished
pub trait JsonObject: Any {
    fn on_new_object(&mut self) {}

    fn on_object_finished(&mut self) {}
}

// -----------------------------------------------------------------------------
// PropertyInfo

trait PropertyAccess: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Any) -> &'a dyn Any;

    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> &'a mut dyn Any;
}

struct FieldAccess<O, F> {
    get: fn(&O) -> &F,
    get_mut: fn(&mut O) -> &mut F,
}

impl<O: Any, F: Any> PropertyAccess for FieldAccess<O, F> {
    #[inline]
    fn get<'a>(&self, owner: &'a dyn Any) -> &'a dyn Any {
        (self.get)(cast_ref::<O>(owner))
    }

    #[inline]
    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> &'a mut dyn Any {
        (self.get_mut)(cast_mut::<O>(owner))
    }
}

/// A named member of an [`ObjectInfo`].
///
/// Pairs the JSON key with accessors to the field that holds its value.
/// Usually built with the [`property!`](crate::property) macro.
#[derive(Clone)]
pub struct PropertyInfo {
    name: &'static str,
    ty: Type,
    type_info: fn() -> TypeInfo,
    access: Arc<dyn PropertyAccess>,
}

impl PropertyInfo {
    /// Creates a property named `name` of owner `O`, holding a value of type `F`.
    pub fn new<O: Any, F: JsonTyped>(
        name: &'static str,
        get: fn(&O) -> &F,
        get_mut: fn(&mut O) -> &mut F,
    ) -> Self {
        Self {
            name,
            ty: Type::of::<F>(),
            type_info: F::type_info,
            access: Arc::new(FieldAccess { get, get_mut }),
        }
    }

    /// The JSON key, matched exactly.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type of the property.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Builds the [`TypeInfo`] of the declared type.
    #[inline]
    pub fn type_info(&self) -> TypeInfo {
        (self.type_info)()
    }

    /// Returns `true` if the declared type is an `Option`.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.type_info().is_nullable()
    }

    #[inline]
    pub(crate) fn get<'a>(&self, owner: &'a dyn Any) -> &'a dyn Any {
        self.access.get(owner)
    }

    #[inline]
    pub(crate) fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> &'a mut dyn Any {
        self.access.get_mut(owner)
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// Creates a [`PropertyInfo`] for a field.
///
/// `property!(Owner, "Key" => field)` expands to a property named `"Key"`
/// that reads and writes `owner.field`.
///
/// # Examples
///
/// ```
/// use sj_codec::property;
///
/// struct Person {
///     age: u8,
/// }
///
/// let prop = property!(Person, "Age" => age);
/// assert_eq!(prop.name(), "Age");
/// assert!(prop.ty().is::<u8>());
/// ```
#[macro_export]
macro_rules! property {
    ($owner:ty, $name:literal => $field:ident) => {
        $crate::info::PropertyInfo::new::<$owner, _>(
            $name,
            |owner: &$owner| &owner.$field,
            |owner: &mut $owner| &mut owner.$field,
        )
    };
}

// -----------------------------------------------------------------------------
// ObjectInfo

/// Type information of an object with a fixed set of named properties.
///
/// Properties are kept in declaration order, which is the order they are
/// written in.
///
/// # Panics
///
/// [`ObjectInfo::new`] panics if two properties have the same name.
///
/// # Examples
///
/// ```
/// use sj_codec::info::{JsonObject, JsonTyped, ObjectInfo, TypeInfo};
/// use sj_codec::property;
///
/// #[derive(Default)]
/// struct Size {
///     width: u32,
///     height: u32,
/// }
///
/// impl JsonObject for Size {}
///
/// impl JsonTyped for Size {
///     fn type_info() -> TypeInfo {
///         TypeInfo::Object(ObjectInfo::new::<Self>([
///             property!(Self, "Width" => width),
///             property!(Self, "Height" => height),
///         ]))
///     }
/// }
///
/// let info = Size::type_info();
/// let object = info.as_object().unwrap();
///
/// assert_eq!(object.property_len(), 2);
/// assert_eq!(object.index_of("Height"), Some(1));
/// assert_eq!(object.index_of("height"), None);
/// ```
#[derive(Clone)]
pub struct ObjectInfo {
    ty: Type,
    properties: Box<[PropertyInfo]>,
    index: HashMap<&'static str, usize>,
    on_new_object: fn(&mut dyn Any),
    on_object_finished: fn(&mut dyn Any),
}

impl ObjectInfo {
    /// Creates the [`ObjectInfo`] of `T`.
    ///
    /// The order of properties is fixed and depends on the input order.
    pub fn new<T: JsonObject>(properties: impl IntoIterator<Item = PropertyInfo>) -> Self {
        fn on_new_object<T: JsonObject>(value: &mut dyn Any) {
            cast_mut::<T>(value).on_new_object();
        }

        fn on_object_finished<T: JsonObject>(value: &mut dyn Any) {
            cast_mut::<T>(value).on_object_finished();
        }

        let ty = Type::of::<T>();
        let properties: Box<[PropertyInfo]> = properties.into_iter().collect();

        let mut index = HashMap::with_capacity_and_hasher(properties.len(), Default::default());
        for (i, property) in properties.iter().enumerate() {
            if index.insert(property.name, i).is_some() {
                duplicate_property(&ty, property.name);
            }
        }

        Self {
            ty,
            properties,
            index,
            on_new_object: on_new_object::<T>,
            on_object_finished: on_object_finished::<T>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the property with the given JSON key, if present.
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.get(*self.index.get(name)?)
    }

    /// Returns the property at the given declaration index, if present.
    #[inline]
    pub fn property_at(&self, index: usize) -> Option<&PropertyInfo> {
        self.properties.get(index)
    }

    /// Returns the declaration index of the property with the given JSON key.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns an iterator over the properties in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PropertyInfo> {
        self.properties.iter()
    }

    #[inline]
    pub fn property_len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub(crate) fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    #[inline]
    pub(crate) fn on_new_object(&self, value: &mut dyn Any) {
        (self.on_new_object)(value);
    }

    #[inline]
    pub(crate) fn on_object_finished(&self, value: &mut dyn Any) {
        (self.on_object_finished)(value);
    }
}

impl fmt::Debug for ObjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectInfo")
            .field("ty", &self.ty)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

#[cold]
#[inline(never)]
fn duplicate_property(ty: &Type, name: &str) -> ! {
    panic!("property `{name}` is declared twice on `{ty}`");
}

// -----------------------------------------------------------------------------
// Tests
