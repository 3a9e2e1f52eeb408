use core::any::Any;

use sj_text::{Cursor, JsonBuffer, JsonError, JsonUnit, unescape};

use crate::info::ObjectInfo;
use crate::resolve::{CodecId, CodecTable};

// -----------------------------------------------------------------------------
// Encode

/// Writes `{"Name":value,...}` with every property in declaration order.
pub(super) fn encode<U: JsonUnit>(
    table: &CodecTable,
    info: &ObjectInfo,
    properties: &[CodecId],
    value: &dyn Any,
    out: &mut JsonBuffer<U>,
) -> Result<(), JsonError> {
    out.push_ascii(b'{');
    for (index, (property, &codec)) in info.properties().iter().zip(properties).enumerate() {
        if index > 0 {
            out.push_ascii(b',');
        }
        out.append_quoted(property.name());
        out.push_ascii(b':');
        super::encode(table, codec, property.get(value), out)?;
    }
    out.push_ascii(b'}');
    Ok(())
}

// -----------------------------------------------------------------------------
// Decode

/// Where the object decoder is between two tokens.
///
/// A property index of `None` marks a key the object does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectOpenBrace,
    ExpectPropertyNameOrClose { after_comma: bool },
    ExpectColon(Option<usize>),
    ExpectValue(Option<usize>),
    ExpectCommaOrClose,
    Closed,
}

/// Decodes a JSON object into `value`, property by property.
///
/// Right after `{`, every `Option` property is reset to `None` and the
/// [`on_new_object`] hook runs. Keys are matched exactly, unknown keys have
/// their value skipped. Properties absent from the input keep what they
/// held before. [`on_object_finished`] runs after `}`.
///
/// [`on_new_object`]: crate::info::JsonObject::on_new_object
/// [`on_object_finished`]: crate::info::JsonObject::on_object_finished
pub(super) fn decode<U: JsonUnit>(
    table: &CodecTable,
    info: &ObjectInfo,
    properties: &[CodecId],
    nullable: &[(usize, fn(&mut dyn Any))],
    cursor: &mut Cursor<'_, U>,
    value: &mut dyn Any,
) -> Result<(), JsonError> {
    let mut state = State::ExpectOpenBrace;

    loop {
        state = match state {
            State::ExpectOpenBrace => {
                cursor.skip_whitespace();
                cursor.expect(b'{')?;

                for &(index, set_none) in nullable {
                    set_none(info.properties()[index].get_mut(value));
                }
                info.on_new_object(value);

                State::ExpectPropertyNameOrClose { after_comma: false }
            }
            State::ExpectPropertyNameOrClose { after_comma } => {
                cursor.skip_whitespace();
                if !after_comma && cursor.consume(b'}') {
                    State::Closed
                } else {
                    cursor.expect_quote()?;
                    State::ExpectColon(read_property_name(info, cursor)?)
                }
            }
            State::ExpectColon(index) => {
                cursor.skip_whitespace();
                cursor.expect(b':')?;
                State::ExpectValue(index)
            }
            State::ExpectValue(Some(index)) => {
                let property = &info.properties()[index];
                super::decode(table, properties[index], cursor, property.get_mut(value))?;
                State::ExpectCommaOrClose
            }
            State::ExpectValue(None) => {
                cursor.skip_value()?;
                State::ExpectCommaOrClose
            }
            State::ExpectCommaOrClose => {
                cursor.skip_whitespace();
                if cursor.consume(b',') {
                    State::ExpectPropertyNameOrClose { after_comma: true }
                } else {
                    cursor.expect(b'}')?;
                    State::Closed
                }
            }
            State::Closed => {
                info.on_object_finished(value);
                return Ok(());
            }
        };
    }
}

/// Reads a key after its opening quote and looks it up.
///
/// Keys without escapes are compared in place.
fn read_property_name<U: JsonUnit>(
    info: &ObjectInfo,
    cursor: &mut Cursor<'_, U>,
) -> Result<Option<usize>, JsonError> {
    let start = cursor.position();
    let raw = cursor.read_to_closing_quote()?;

    let index = if raw.iter().any(|unit| unit.is(b'\\')) {
        let name = unescape(raw).map_err(|err| err.offset_by(start))?;
        info.index_of(&name)
    } else {
        info.iter().position(|property| U::eq_str(raw, property.name()))
    };

    if index.is_none() {
        log::trace!(
            "skipping unknown property `{}` of `{}`",
            U::decode_lossy(raw),
            info.ty()
        );
    }
    Ok(index)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use sj_text::{Cursor, ErrorKind, JsonBuffer, JsonError};

    use crate::info::{JsonObject, JsonTyped, ObjectInfo, TypeInfo};
    use crate::property;
    use crate::registry::ConverterRegistry;
    use crate::resolve::{CodecResolver, CodecTable};

    #[derive(Default, Debug, PartialEq)]
    struct Person {
        age: u8,
        name: String,
        nickname: Option<String>,
        started: usize,
        finished: usize,
    }

    impl JsonObject for Person {
        fn on_new_object(&mut self) {
            self.started += 1;
        }

        fn on_object_finished(&mut self) {
            self.finished += 1;
        }
    }

    impl JsonTyped for Person {
        fn type_info() -> TypeInfo {
            TypeInfo::Object(ObjectInfo::new::<Self>([
                property!(Self, "Age" => age),
                property!(Self, "Name" => name),
                property!(Self, "Nickname" => nickname),
            ]))
        }
    }

    fn table() -> (CodecTable, crate::resolve::CodecId) {
        let registry = ConverterRegistry::new();
        let mut table = CodecTable::new();
        let id = CodecResolver::new(&registry, &mut table).resolve(Person::type_info());
        (table, id)
    }

    fn decode(person: &mut Person, input: &str) -> Result<(), JsonError> {
        let (table, id) = table();
        let input: Vec<u16> = input.encode_utf16().collect();
        crate::codec::decode(&table, id, &mut Cursor::new(&input), person)
    }

    #[test]
    fn encode_in_declaration_order() {
        let (table, id) = table();
        let person = Person {
            age: 42,
            name: "Ann \"A\"".into(),
            ..Person::default()
        };

        let mut out = JsonBuffer::<u8>::new();
        crate::codec::encode(&table, id, &person, &mut out).unwrap();
        assert_eq!(
            out.as_slice(),
            br#"{"Age":42,"Name":"Ann \"A\"","Nickname":null}"#
        );
    }

    #[test]
    fn hooks_and_nullable_reset() {
        let mut person = Person {
            age: 7,
            nickname: Some("old".into()),
            ..Person::default()
        };

        decode(&mut person, r#" { "Name" : "Bo" } "#).unwrap();
        assert_eq!(person.age, 7);
        assert_eq!(person.name, "Bo");
        assert_eq!(person.nickname, None);
        assert_eq!((person.started, person.finished), (1, 1));

        decode(&mut person, "{}").unwrap();
        assert_eq!((person.started, person.finished), (2, 2));
    }

    #[test]
    fn unknown_and_escaped_keys() {
        let mut person = Person::default();
        decode(
            &mut person,
            r#"{"Extra":{"a":[1,"}"]},"Age":30,"age":99,"Na\u006de":"Zed","Nickname":"Al"}"#,
        )
        .unwrap();

        assert_eq!(person.age, 30);
        assert_eq!(person.name, "Zed");
        assert_eq!(person.nickname.as_deref(), Some("Al"));
    }

    #[test]
    fn malformed_objects() {
        let cases = [
            ("null", ErrorKind::MalformedJson),
            (r#"{"Age":1,}"#, ErrorKind::MalformedJson),
            (r#"{"Age" 1}"#, ErrorKind::MalformedJson),
            (r#"{"Age":1 "Name":"x"}"#, ErrorKind::MalformedJson),
            (r#"{"Age":256}"#, ErrorKind::InvalidNumber),
            (r#"{"Age":1"#, ErrorKind::UnexpectedEndOfInput),
            (r#"{"Age":"#, ErrorKind::UnexpectedEndOfInput),
            (r#"{"Nickname": "#, ErrorKind::UnexpectedEndOfInput),
            (r#"{"Unknown":"#, ErrorKind::UnexpectedEndOfInput),
            (r#"{"Age"#, ErrorKind::UnterminatedString),
        ];

        for (input, kind) in cases {
            let mut person = Person::default();
            let err = decode(&mut person, input).unwrap_err();
            assert_eq!(err.kind(), kind, "{input}");
        }
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    #[test]
    fn error_carries_type_stack() {
        let mut person = Person::default();
        let err = decode(&mut person, r#"{"Nickname":5}"#).unwrap_err();

        let stack: Vec<_> = err.type_stack().collect();
        assert_eq!(stack.len(), 3);
        assert!(stack[0].ends_with("Person"));
        assert!(stack[1].contains("Option"));
        assert_eq!(stack[2], "alloc::string::String");
    }
}
