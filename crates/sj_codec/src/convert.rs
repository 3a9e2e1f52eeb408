use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use sj_text::{Cursor, ErrorKind, JsonBuffer, JsonError, JsonUnit};

use crate::codec;
use crate::info::{JsonTyped, TypeInfo};
use crate::registry::{ConverterHandle, ConverterRegistry, CustomConverter};
use crate::resolve::{CodecId, CodecResolver, CodecTable};

// -----------------------------------------------------------------------------
// JsonConverter

/// The conversion entry points.
///
/// A converter is prepared once with [`register`] and
/// [`register_converter`], which need `&mut self`. It is then shared freely:
/// every conversion takes `&self` and keeps its buffers call-local.
///
/// Converting a type that was never registered still works. The codecs it
/// is missing are resolved for that call only, into a small table layered
/// over the registered ones, so such calls allocate. Register hot types up
/// front.
///
/// # Examples
///
/// ```
/// use sj_codec::JsonConverter;
///
/// let mut json = JsonConverter::new();
/// json.register::<Vec<Option<i16>>>();
///
/// let list: Vec<Option<i16>> = vec![Some(-32768), None, Some(42)];
/// assert_eq!(json.to_json_string(&list).unwrap(), "[-32768,null,42]");
///
/// let utf16: Vec<u16> = "[1, null]".encode_utf16().collect();
/// let decoded = json.from_json_utf16(Some(list), &utf16).unwrap();
/// assert_eq!(decoded, Some(vec![Some(1), None]));
/// ```
///
/// [`register`]: JsonConverter::register
/// [`register_converter`]: JsonConverter::register_converter
#[derive(Default)]
pub struct JsonConverter {
    registry: ConverterRegistry,
    table: Arc<CodecTable>,
    roots: Vec<fn() -> TypeInfo>,
}

impl JsonConverter {
    #[inline]
    pub fn new() -> Self {
        Self {
            registry: ConverterRegistry::new(),
            table: Arc::new(CodecTable::new()),
            roots: Vec::new(),
        }
    }

    /// Resolves the codecs of `T` and of every type it contains.
    ///
    /// Registering a type twice is a no-op.
    pub fn register<T: JsonTyped>(&mut self) -> CodecId {
        if let Some(id) = self.table.id_of(TypeId::of::<T>()) {
            return id;
        }

        self.roots.push(T::type_info);
        let table = Arc::make_mut(&mut self.table);
        CodecResolver::new(&self.registry, table).resolve(T::type_info())
    }

    /// Registers a custom converter for `T`, replacing any previous one.
    ///
    /// Codecs resolved before are rebuilt, so the converter applies wherever
    /// `T` appears, including inside types registered earlier.
    pub fn register_converter<T: Any, C: CustomConverter<T>>(
        &mut self,
        converter: C,
    ) -> ConverterHandle {
        let handle = self.registry.register::<T, C>(converter);
        self.rebuild();
        handle
    }

    /// Removes the custom converter of `T`, returning its handle.
    pub fn unregister_converter<T: Any>(&mut self) -> Option<ConverterHandle> {
        let handle = self.registry.unregister::<T>()?;
        self.rebuild();
        Some(handle)
    }

    /// Returns `true` if the codec of `T` was resolved by [`register`].
    ///
    /// [`register`]: JsonConverter::register
    #[inline]
    pub fn is_registered<T: Any>(&self) -> bool {
        self.table.contains(TypeId::of::<T>())
    }

    #[inline]
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    #[inline]
    pub fn table(&self) -> &CodecTable {
        &self.table
    }

    fn rebuild(&mut self) {
        if self.table.is_empty() {
            return;
        }

        let table = Arc::make_mut(&mut self.table);
        table.clear();
        let mut resolver = CodecResolver::new(&self.registry, table);
        for root in &self.roots {
            resolver.resolve(root());
        }
        log::debug!(
            "rebuilt {} codecs from {} registered types",
            self.table.len(),
            self.roots.len()
        );
    }

    // -------------------------------------------------------------------------
    // Encode

    /// Writes `value` as UTF-16 JSON text.
    ///
    /// # Errors
    ///
    /// Only a custom converter can fail.
    #[inline]
    pub fn to_json_utf16<T: JsonTyped>(&self, value: &T) -> Result<Vec<u16>, JsonError> {
        self.encode(value)
    }

    /// Writes `value` as UTF-8 JSON text.
    ///
    /// # Errors
    ///
    /// Only a custom converter can fail.
    #[inline]
    pub fn to_json_utf8<T: JsonTyped>(&self, value: &T) -> Result<Vec<u8>, JsonError> {
        self.encode(value)
    }

    pub fn to_json_string<T: JsonTyped>(&self, value: &T) -> Result<String, JsonError> {
        String::from_utf8(self.to_json_utf8(value)?)
            .map_err(|_| JsonError::custom("custom converter wrote invalid UTF-8"))
    }

    fn encode<T: JsonTyped, U: JsonUnit>(&self, value: &T) -> Result<Vec<U>, JsonError> {
        let mut out = JsonBuffer::new();
        self.with_codec::<T, _>(|table, id| codec::encode(table, id, value, &mut out))?;
        Ok(out.into_inner())
    }

    // -------------------------------------------------------------------------
    // Decode

    /// Reads UTF-16 JSON text.
    ///
    /// A top-level `null` gives `None`. Any other value is decoded into
    /// `target`, or into `T::default()` when there is no target. Properties
    /// and items absent from the input keep their previous value in a
    /// reused target.
    ///
    /// # Errors
    ///
    /// Fails on malformed input and on anything but whitespace after the
    /// value. The target may be partially updated when an error is returned,
    /// which is why it is consumed.
    #[inline]
    pub fn from_json_utf16<T: JsonTyped + Default>(
        &self,
        target: Option<T>,
        input: &[u16],
    ) -> Result<Option<T>, JsonError> {
        self.decode(target, input)
    }

    /// Reads UTF-8 JSON text. See [`from_json_utf16`](Self::from_json_utf16).
    #[inline]
    pub fn from_json_utf8<T: JsonTyped + Default>(
        &self,
        target: Option<T>,
        input: &[u8],
    ) -> Result<Option<T>, JsonError> {
        self.decode(target, input)
    }

    #[inline]
    pub fn from_json_str<T: JsonTyped + Default>(
        &self,
        target: Option<T>,
        input: &str,
    ) -> Result<Option<T>, JsonError> {
        self.decode(target, input.as_bytes())
    }

    fn decode<T: JsonTyped + Default, U: JsonUnit>(
        &self,
        target: Option<T>,
        input: &[U],
    ) -> Result<Option<T>, JsonError> {
        let mut cursor = Cursor::new(input);
        cursor.skip_whitespace();

        let value = if cursor.match_literal("null") {
            None
        } else {
            let mut value = target.unwrap_or_default();
            self.with_codec::<T, _>(|table, id| {
                codec::decode(table, id, &mut cursor, &mut value)
            })?;
            Some(value)
        };

        cursor.skip_whitespace();
        if !cursor.is_at_end() {
            return Err(cursor.error_here(
                ErrorKind::MalformedJson,
                "unexpected data after the top-level value",
            ));
        }
        Ok(value)
    }

    /// Runs `f` with the codec of `T`, resolving it for this call if needed.
    fn with_codec<T: JsonTyped, R>(&self, f: impl FnOnce(&CodecTable, CodecId) -> R) -> R {
        if let Some(id) = self.table.id_of(TypeId::of::<T>()) {
            return f(&*self.table, id);
        }

        log::debug!("`{}` is not registered, resolving it for this call", type_name::<T>());
        let mut layer = CodecTable::layered(self.table.clone());
        let id = CodecResolver::new(&self.registry, &mut layer).resolve(T::type_info());
        f(&layer, id)
    }
}

impl fmt::Debug for JsonConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonConverter")
            .field("registry", &self.registry)
            .field("table", &self.table)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use sj_text::{DateTime, DateTimeKind, ErrorKind, JsonError, JsonReader, JsonWriter};
    use uuid::Uuid;

    use super::JsonConverter;
    use crate::info::{JsonObject, JsonTyped, ObjectInfo, TypeInfo};
    use crate::property;
    use crate::registry::CustomConverter;

    fn utf16(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[derive(Default, Debug, PartialEq)]
    struct Body {
        age: u8,
        height: u8,
        min: u8,
        max: u8,
    }

    impl JsonObject for Body {}

    impl JsonTyped for Body {
        fn type_info() -> TypeInfo {
            TypeInfo::Object(ObjectInfo::new::<Self>([
                property!(Self, "Age" => age),
                property!(Self, "Height" => height),
                property!(Self, "Min" => min),
                property!(Self, "Max" => max),
            ]))
        }
    }

    #[derive(Default, Debug, PartialEq)]
    struct Node {
        name: String,
        children: Vec<Node>,
        weight: Option<f64>,
    }

    impl JsonObject for Node {}

    impl JsonTyped for Node {
        fn type_info() -> TypeInfo {
            TypeInfo::Object(ObjectInfo::new::<Self>([
                property!(Self, "Name" => name),
                property!(Self, "Children" => children),
                property!(Self, "Weight" => weight),
            ]))
        }
    }

    struct UpperCase;

    impl CustomConverter<String> for UpperCase {
        fn to_json(&self, writer: &mut dyn JsonWriter, value: &String) -> Result<(), JsonError> {
            writer.write_string(&value.to_uppercase());
            Ok(())
        }

        fn from_json(&self, reader: &mut dyn JsonReader, value: &mut String) -> Result<(), JsonError> {
            *value = reader.read_string()?.to_uppercase();
            Ok(())
        }
    }

    #[test]
    fn byte_properties() {
        let mut json = JsonConverter::new();
        json.register::<Body>();

        let body = Body {
            age: 42,
            height: 176,
            min: 0,
            max: 255,
        };
        let text = json.to_json_string(&body).unwrap();
        assert_eq!(text, r#"{"Age":42,"Height":176,"Min":0,"Max":255}"#);

        let decoded = json.from_json_utf16::<Body>(None, &utf16(&text)).unwrap();
        assert_eq!(decoded, Some(body));
    }

    #[test]
    fn nullable_short_list() {
        let json = JsonConverter::new();
        let list = vec![
            Some(i16::MIN),
            Some(-1),
            Some(0),
            Some(1),
            Some(42),
            None,
            Some(i16::MAX),
        ];

        let text = json.to_json_utf16(&list).unwrap();
        assert_eq!(text, utf16("[-32768,-1,0,1,42,null,32767]"));
        assert_eq!(json.from_json_utf16::<Vec<Option<i16>>>(None, &text).unwrap(), Some(list));
    }

    #[test]
    fn guid_lists_null_empty_and_reuse() {
        let mut json = JsonConverter::new();
        json.register::<Option<Vec<Uuid>>>();

        let ids = vec![
            Uuid::from_u128(0x00000001_0002_0003_0405_060708090a0b),
            Uuid::nil(),
        ];
        let text = json.to_json_string(&Some(ids.clone())).unwrap();
        assert_eq!(
            text,
            r#"["00000001-0002-0003-0405-060708090a0b","00000000-0000-0000-0000-000000000000"]"#
        );

        let none: Option<Vec<Uuid>> = None;
        assert_eq!(json.to_json_string(&none).unwrap(), "null");
        assert_eq!(json.to_json_string(&Some(Vec::<Uuid>::new())).unwrap(), "[]");

        let empty = json.from_json_str::<Option<Vec<Uuid>>>(None, " [ ] ").unwrap();
        assert_eq!(empty, Some(Some(vec![])));

        let mut reused = Vec::with_capacity(8);
        reused.push(Uuid::nil());
        let decoded = json
            .from_json_str::<Option<Vec<Uuid>>>(Some(Some(reused)), &text)
            .unwrap()
            .flatten()
            .unwrap();
        assert_eq!(decoded, ids);
        assert!(decoded.capacity() >= 8);
    }

    #[test]
    fn top_level_null() {
        let json = JsonConverter::new();
        let decoded = json.from_json_str::<Vec<i32>>(Some(vec![1]), "  null ").unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn converter_wins_over_builtin_string() {
        let mut json = JsonConverter::new();
        json.register::<Node>();
        assert!(json.is_registered::<String>());

        let handle = json.register_converter::<String, _>(UpperCase);
        assert_eq!(json.registry().handle_of::<String>(), Some(handle));

        let node = Node {
            name: "root".into(),
            ..Node::default()
        };
        let text = json.to_json_string(&node).unwrap();
        assert_eq!(text, r#"{"Name":"ROOT","Children":[],"Weight":null}"#);

        let decoded = json
            .from_json_str::<Node>(None, r#"{"Name":"leaf"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(decoded.name, "LEAF");

        assert_eq!(json.unregister_converter::<String>(), Some(handle));
        assert_eq!(
            json.to_json_string(&node).unwrap(),
            r#"{"Name":"root","Children":[],"Weight":null}"#
        );
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let json = JsonConverter::new();
        let text = r#"{"Extra":[{"x":"]"},null,true],"Age":1,"Unused":"\"}","Max":2}"#;

        let decoded = json.from_json_str::<Body>(None, text).unwrap().unwrap();
        assert_eq!(
            decoded,
            Body {
                age: 1,
                max: 2,
                ..Body::default()
            }
        );
    }

    #[test]
    fn self_referential_tree_and_buffer_parity() {
        let mut json = JsonConverter::new();
        json.register::<Node>();

        let tree = Node {
            name: "a\u{e9}\u{1F600}\"\\\n".into(),
            children: vec![
                Node {
                    name: "b".into(),
                    weight: Some(0.5),
                    ..Node::default()
                },
                Node {
                    name: "c".into(),
                    children: vec![Node::default()],
                    weight: Some(-1e-7),
                },
            ],
            weight: None,
        };

        let wide = json.to_json_utf16(&tree).unwrap();
        let narrow = json.to_json_utf8(&tree).unwrap();
        assert_eq!(
            String::from_utf16(&wide).unwrap(),
            String::from_utf8(narrow.clone()).unwrap()
        );

        let value: serde_json::Value = serde_json::from_slice(&narrow).unwrap();
        assert_eq!(value["Children"][1]["Children"][0]["Name"], "");

        let from_wide = json.from_json_utf16::<Node>(None, &wide).unwrap();
        assert_eq!(from_wide.as_ref(), Some(&tree));
        assert_eq!(json.from_json_utf8::<Node>(None, &narrow).unwrap(), Some(tree));
    }

    #[test]
    fn date_time_round_trip() {
        let json = JsonConverter::new();

        let utc = DateTime::from_parts(2017, 7, 25, 23, 59, 58, 123, DateTimeKind::Utc).unwrap();
        let text = json.to_json_string(&utc).unwrap();
        assert_eq!(text, r#""2017-07-25T23:59:58.123Z""#);
        assert_eq!(json.from_json_str::<DateTime>(None, &text).unwrap(), Some(utc));

        let plain = json
            .from_json_utf16::<DateTime>(None, &utf16(r#""2017-07-25""#))
            .unwrap()
            .unwrap();
        assert_eq!(plain.kind(), DateTimeKind::Unspecified);
        assert_eq!(plain.to_string(), "2017-07-25T00:00:00");
    }

    #[test]
    fn errors() {
        let json = JsonConverter::new();

        let err = json.from_json_str::<i32>(None, "1 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
        assert_eq!(err.position(), 2);

        let err = json.from_json_str::<Body>(None, r#"{"Age":300}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumber);
        assert_eq!(err.position(), 7);

        let err = json.from_json_str::<String>(None, r#""open"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedString);

        let err = json.from_json_str::<String>(None, r#""\q""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEscape);

        let err = json.from_json_str::<DateTime>(None, r#""2017-13-01""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDateTime);

        let err = json.from_json_str::<Vec<u8>>(None, "[00]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumber);
    }

    #[test]
    fn truncated_input_is_end_of_input() {
        let json = JsonConverter::new();

        for input in [r#"{"Age":"#, r#"{"Other":"#, r#"{"Age":1,"Max":  "#, "{"] {
            let err = json.from_json_str::<Body>(None, input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput, "{input}");
        }

        let err = json.from_json_str::<Vec<u8>>(None, "[1,").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);

        let err = json.from_json_utf16::<bool>(None, &utf16(" ")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);

        let err = json.from_json_str::<u8>(None, "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);

        let err = json.from_json_str::<u8>(None, "-").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumber);
    }

    #[test]
    fn lazy_resolution_leaves_table_untouched() {
        let mut json = JsonConverter::new();
        json.register::<u8>();

        assert_eq!(
            json.to_json_string(&Body::default()).unwrap(),
            r#"{"Age":0,"Height":0,"Min":0,"Max":0}"#
        );
        assert!(!json.is_registered::<Body>());
        assert_eq!(json.table().len(), 1);
    }

    #[test]
    fn converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonConverter>();
    }
}
