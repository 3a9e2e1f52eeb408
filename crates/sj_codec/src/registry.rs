use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use sj_text::{JsonError, JsonReader, JsonWriter};
use sj_utils::TypeIdMap;

use crate::cast::{cast_mut, cast_ref};
use crate::info::Type;

// -----------------------------------------------------------------------------
// CustomConverter

/// A user-supplied codec that replaces the default one of `T`.
///
/// A converter takes precedence over every built-in codec, including the
/// ones of primitives and `String`. It owns all tokens of its value:
/// [`from_json`] must consume exactly one JSON value (after optional
/// whitespace) and [`to_json`] must write exactly one.
///
/// `null` is handled by the enclosing `Option<T>`, so a converter of `T`
/// only sees `null` where `T` itself is not wrapped in an `Option`.
///
/// # Examples
///
/// ```
/// use sj_codec::CustomConverter;
/// use sj_text::{JsonError, JsonReader, JsonWriter};
///
/// struct UpperCase;
///
/// impl CustomConverter<String> for UpperCase {
///     fn to_json(&self, writer: &mut dyn JsonWriter, value: &String) -> Result<(), JsonError> {
///         writer.write_string(&value.to_uppercase());
///         Ok(())
///     }
///
///     fn from_json(&self, reader: &mut dyn JsonReader, value: &mut String) -> Result<(), JsonError> {
///         *value = reader.read_string()?.to_uppercase();
///         Ok(())
///     }
/// }
/// ```
///
/// [`from_json`]: CustomConverter::from_json
/// [`to_json`]: CustomConverter::to_json
pub trait CustomConverter<T>: Send + Sync + 'static {
    fn to_json(&self, writer: &mut dyn JsonWriter, value: &T) -> Result<(), JsonError>;

    fn from_json(&self, reader: &mut dyn JsonReader, value: &mut T) -> Result<(), JsonError>;
}

/// A [`CustomConverter`] with its value type erased.
pub(crate) trait ErasedConverter: Send + Sync {
    fn to_json(&self, writer: &mut dyn JsonWriter, value: &dyn Any) -> Result<(), JsonError>;

    fn from_json(&self, reader: &mut dyn JsonReader, value: &mut dyn Any)
    -> Result<(), JsonError>;
}

struct Erased<T, C> {
    converter: C,
    // `fn() -> T` keeps `Erased` `Send + Sync` whatever `T` is.
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any, C: CustomConverter<T>> ErasedConverter for Erased<T, C> {
    #[inline]
    fn to_json(&self, writer: &mut dyn JsonWriter, value: &dyn Any) -> Result<(), JsonError> {
        self.converter.to_json(writer, cast_ref::<T>(value))
    }

    #[inline]
    fn from_json(
        &self,
        reader: &mut dyn JsonReader,
        value: &mut dyn Any,
    ) -> Result<(), JsonError> {
        self.converter.from_json(reader, cast_mut::<T>(value))
    }
}

// -----------------------------------------------------------------------------
// ConverterHandle

/// An opaque handle to one converter registration.
///
/// Handles are unique within one [`ConverterRegistry`] and increase with
/// each registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConverterHandle(u32);

impl ConverterHandle {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ConverterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converter#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// ConverterRegistry

/// A registered converter together with its handle and target type.
#[derive(Clone)]
pub(crate) struct ConverterEntry {
    pub handle: ConverterHandle,
    pub ty: Type,
    pub converter: Arc<dyn ErasedConverter>,
}

/// A map from type to its [`CustomConverter`].
///
/// Consulted first by the codec resolver. Registering a second converter
/// for the same type replaces the first one.
///
/// # Examples
///
/// ```
/// use sj_codec::{ConverterRegistry, CustomConverter};
/// use sj_text::{JsonError, JsonReader, JsonWriter};
///
/// struct Hex;
///
/// impl CustomConverter<u32> for Hex {
///     fn to_json(&self, writer: &mut dyn JsonWriter, value: &u32) -> Result<(), JsonError> {
///         writer.write_string(&format!("{value:x}"));
///         Ok(())
///     }
///
///     fn from_json(&self, reader: &mut dyn JsonReader, value: &mut u32) -> Result<(), JsonError> {
///         let text = reader.read_string()?;
///         *value = u32::from_str_radix(&text, 16).map_err(|_| JsonError::custom("bad hex"))?;
///         Ok(())
///     }
/// }
///
/// let mut registry = ConverterRegistry::new();
/// let first = registry.register::<u32, _>(Hex);
/// let second = registry.register::<u32, _>(Hex);
///
/// assert!(first < second);
/// assert_eq!(registry.handle_of::<u32>(), Some(second));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Default, Clone)]
pub struct ConverterRegistry {
    converters: TypeIdMap<ConverterEntry>,
    next_handle: u32,
}

impl ConverterRegistry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            converters: TypeIdMap::new(),
            next_handle: 0,
        }
    }

    /// Registers `converter` for `T`, replacing any previous one.
    pub fn register<T: Any, C: CustomConverter<T>>(&mut self, converter: C) -> ConverterHandle {
        let handle = ConverterHandle(self.next_handle);
        self.next_handle += 1;

        let entry = ConverterEntry {
            handle,
            ty: Type::of::<T>(),
            converter: Arc::new(Erased {
                converter,
                _marker: PhantomData,
            }),
        };

        if let Some(old) = self.converters.insert_type::<T>(entry) {
            log::warn!(
                "custom converter for `{}` replaced: {} -> {handle}",
                old.ty,
                old.handle
            );
        }
        handle
    }

    /// Removes the converter of `T`, returning its handle.
    pub fn unregister<T: Any>(&mut self) -> Option<ConverterHandle> {
        self.converters
            .remove(&TypeId::of::<T>())
            .map(|entry| entry.handle)
    }

    /// Returns the handle of the converter registered for `T`.
    #[inline]
    pub fn handle_of<T: Any>(&self) -> Option<ConverterHandle> {
        self.converters.get_type::<T>().map(|entry| entry.handle)
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.converters.contains(&type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    #[inline]
    pub(crate) fn get(&self, type_id: TypeId) -> Option<&ConverterEntry> {
        self.converters.get(&type_id)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.converters.values().map(|entry| (entry.handle, entry.ty)))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use sj_text::{JsonError, JsonReader, JsonWriter};

    use super::{ConverterRegistry, CustomConverter};

    struct Constant(&'static str);

    impl CustomConverter<String> for Constant {
        fn to_json(&self, writer: &mut dyn JsonWriter, _: &String) -> Result<(), JsonError> {
            writer.write_string(self.0);
            Ok(())
        }

        fn from_json(&self, reader: &mut dyn JsonReader, value: &mut String) -> Result<(), JsonError> {
            reader.skip_value()?;
            *value = self.0.into();
            Ok(())
        }
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = ConverterRegistry::new();
        let a = registry.register::<String, _>(Constant("a"));
        let b = registry.register::<String, _>(Constant("b"));

        assert_ne!(a, b);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.handle_of::<String>(), Some(b));
        assert_eq!(registry.unregister::<String>(), Some(b));
        assert!(registry.is_empty());
    }

    #[test]
    fn erased_converter_runs_typed_one() {
        let mut registry = ConverterRegistry::new();
        registry.register::<String, _>(Constant("fixed"));
        let entry = registry.get(core::any::TypeId::of::<String>()).unwrap();

        let mut out = sj_text::JsonBuffer::<u8>::new();
        entry.converter.to_json(&mut out, &String::new()).unwrap();
        assert_eq!(out.as_slice(), br#""fixed""#);

        let mut value = String::new();
        let mut cursor = sj_text::Cursor::new(b"[1, 2]".as_slice());
        entry.converter.from_json(&mut cursor, &mut value).unwrap();
        assert_eq!(value, "fixed");
        assert!(cursor.is_at_end());
    }
}
