use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use sj_utils::TypeIdMap;

use crate::info::{ListOps, NullableOps, ObjectInfo, PrimitiveKind, Type, TypeInfo};
use crate::registry::{ConverterHandle, ConverterRegistry, ErasedConverter};

// -----------------------------------------------------------------------------
// CodecId

/// The index of a codec in a [`CodecTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecId(u32);

impl CodecId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// -----------------------------------------------------------------------------
// Codec

/// The codec strategy chosen for one type.
///
/// Composite codecs refer to their children by [`CodecId`], so a table can
/// hold cycles.
#[derive(Clone)]
pub(crate) enum Codec {
    /// Placeholder while the type is being resolved.
    Pending,
    Primitive(PrimitiveKind),
    String,
    DateTime,
    Guid,
    Nullable {
        inner: CodecId,
        ops: NullableOps,
    },
    List {
        item: CodecId,
        ops: ListOps,
    },
    Object {
        info: Arc<ObjectInfo>,
        properties: Box<[CodecId]>,
        /// `set_none` of each `Option` property, by property index.
        nullable: Box<[(usize, fn(&mut dyn Any))]>,
    },
    Custom {
        handle: ConverterHandle,
        converter: Arc<dyn ErasedConverter>,
    },
}

impl Codec {
    fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Primitive(_) => "primitive",
            Self::String => "string",
            Self::DateTime => "date-time",
            Self::Guid => "guid",
            Self::Nullable { .. } => "nullable",
            Self::List { .. } => "list",
            Self::Object { .. } => "object",
            Self::Custom { .. } => "custom",
        }
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { handle, .. } => write!(f, "custom({handle})"),
            _ => f.write_str(self.name()),
        }
    }
}

#[derive(Clone)]
pub(crate) struct CodecEntry {
    pub ty: Type,
    pub codec: Codec,
}

// -----------------------------------------------------------------------------
// CodecTable

/// An arena of resolved codecs, indexed by [`CodecId`] and by type.
///
/// Built by a [`CodecResolver`] and immutable afterwards. A table may be
/// layered over a shared base table: ids below the base length belong to
/// the base, and only the codecs missing from it are stored in the layer.
#[derive(Default, Clone)]
pub struct CodecTable {
    base: Option<Arc<CodecTable>>,
    entries: Vec<CodecEntry>,
    by_type: TypeIdMap<CodecId>,
}

impl CodecTable {
    #[inline]
    pub const fn new() -> Self {
        Self {
            base: None,
            entries: Vec::new(),
            by_type: TypeIdMap::new(),
        }
    }

    /// Creates an empty layer over `base`.
    ///
    /// Codecs of `base` are reused as they are. Nothing is copied.
    #[inline]
    pub fn layered(base: Arc<CodecTable>) -> Self {
        Self {
            base: Some(base),
            entries: Vec::new(),
            by_type: TypeIdMap::new(),
        }
    }

    /// Returns the codec id of a resolved type.
    pub fn id_of(&self, type_id: TypeId) -> Option<CodecId> {
        match self.by_type.get(&type_id) {
            Some(id) => Some(*id),
            None => self.base.as_ref()?.id_of(type_id),
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.id_of(type_id).is_some()
    }

    /// Returns the type a codec was resolved for.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this table.
    #[inline]
    pub fn type_of(&self, id: CodecId) -> &Type {
        &self.entry(id).ty
    }

    /// Number of codecs in the table, those of its base included.
    #[inline]
    pub fn len(&self) -> usize {
        self.offset() + self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all codecs and detaches the base.
    pub fn clear(&mut self) {
        self.base = None;
        self.entries.clear();
        self.by_type = TypeIdMap::new();
    }

    pub(crate) fn entry(&self, id: CodecId) -> &CodecEntry {
        let offset = self.offset();
        match &self.base {
            Some(base) if id.index() < offset => base.entry(id),
            _ => &self.entries[id.index() - offset],
        }
    }

    #[inline]
    fn offset(&self) -> usize {
        self.base.as_ref().map_or(0, |base| base.len())
    }

    fn push(&mut self, ty: Type) -> CodecId {
        let id = CodecId(self.len() as u32);
        self.entries.push(CodecEntry {
            ty,
            codec: Codec::Pending,
        });
        self.by_type.insert(ty.id(), id);
        id
    }

    fn set(&mut self, id: CodecId, codec: Codec) {
        let offset = self.offset();
        self.entries[id.index() - offset].codec = codec;
    }

    fn iter(&self) -> impl Iterator<Item = &CodecEntry> {
        let base = self.base.iter().flat_map(|base| base.iter_boxed());
        base.chain(self.entries.iter())
    }

    fn iter_boxed(&self) -> Box<dyn Iterator<Item = &CodecEntry> + '_> {
        Box::new(self.iter())
    }
}

impl fmt::Debug for CodecTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|entry| (entry.ty.path(), &entry.codec)))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// CodecResolver

/// Builds codecs from [`TypeInfo`]s into a [`CodecTable`].
///
/// The strategy for a type is the first that applies, in this order:
///
/// 1. a custom converter registered for the exact type,
/// 2. `Option<T>`, wrapping the codec of `T`,
/// 3. primitive, string, date-time or GUID,
/// 4. `Vec<T>`, wrapping the codec of `T`,
/// 5. an object, with one codec per property.
///
/// Each type is resolved once per table. A type is entered as pending before
/// its children are resolved, so a type that contains itself refers to its
/// own entry.
///
/// # Panics
///
/// Resolving a [`TypeInfo::Opaque`] type with no converter registered panics.
///
/// # Examples
///
/// ```
/// use sj_codec::{CodecResolver, CodecTable, ConverterRegistry};
/// use sj_codec::info::JsonTyped;
///
/// let registry = ConverterRegistry::new();
/// let mut table = CodecTable::new();
///
/// let mut resolver = CodecResolver::new(&registry, &mut table);
/// let list = resolver.resolve(<Vec<Option<i16>>>::type_info());
/// let again = resolver.resolve(<Vec<Option<i16>>>::type_info());
///
/// assert_eq!(list, again);
/// assert_eq!(table.len(), 3); // Vec<Option<i16>>, Option<i16>, i16
/// ```
pub struct CodecResolver<'a> {
    registry: &'a ConverterRegistry,
    table: &'a mut CodecTable,
}

impl<'a> CodecResolver<'a> {
    #[inline]
    pub fn new(registry: &'a ConverterRegistry, table: &'a mut CodecTable) -> Self {
        Self { registry, table }
    }

    /// Resolves the codec of the described type, reusing the cached one if any.
    pub fn resolve(&mut self, info: TypeInfo) -> CodecId {
        let ty = *info.ty();
        if let Some(id) = self.table.id_of(ty.id()) {
            return id;
        }

        let id = self.table.push(ty);
        let codec = self.build(info);
        log::debug!("resolved `{ty}` as {} codec", codec.name());

        self.table.set(id, codec);
        id
    }

    fn build(&mut self, info: TypeInfo) -> Codec {
        if let Some(entry) = self.registry.get(info.ty().id()) {
            return Codec::Custom {
                handle: entry.handle,
                converter: entry.converter.clone(),
            };
        }

        match info {
            TypeInfo::Nullable(nullable) => Codec::Nullable {
                inner: self.resolve(nullable.inner_info()),
                ops: nullable.ops(),
            },
            TypeInfo::Primitive(primitive) => Codec::Primitive(primitive.kind()),
            TypeInfo::String(_) => Codec::String,
            TypeInfo::DateTime(_) => Codec::DateTime,
            TypeInfo::Guid(_) => Codec::Guid,
            TypeInfo::List(list) => Codec::List {
                item: self.resolve(list.item_info()),
                ops: list.ops(),
            },
            TypeInfo::Object(object) => self.build_object(object),
            TypeInfo::Opaque(ty) => missing_converter(&ty),
        }
    }

    fn build_object(&mut self, object: ObjectInfo) -> Codec {
        let mut properties = Vec::with_capacity(object.property_len());
        let mut nullable = Vec::new();

        for (index, property) in object.iter().enumerate() {
            let info = property.type_info();
            if let TypeInfo::Nullable(inner) = &info {
                nullable.push((index, inner.ops().set_none));
            }
            properties.push(self.resolve(info));
        }

        Codec::Object {
            info: Arc::new(object),
            properties: properties.into_boxed_slice(),
            nullable: nullable.into_boxed_slice(),
        }
    }
}

#[cold]
#[inline(never)]
fn missing_converter(ty: &Type) -> ! {
    panic!("`{ty}` is opaque and has no custom converter registered");
}

// -----------------------------------------------------------------------------
// Tests
