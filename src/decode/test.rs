#![cfg(test)]

use std::cell::RefCell;
use bytes::Bytes;
use crate::{decode, decode_all, decode_prefix, encode};
use crate::codec::{Codec, Observer};
use crate::mode::Mode;
use crate::path::Path;
use crate::schema::Schema;
use crate::string::Flavor;
use crate::tag::Tag;
use crate::value::Value;
use super::DecodeErrorKind;

fn pair() -> Schema {
    Schema::sequence()
        .add_field("a", Schema::integer(), false, None).unwrap()
        .add_field("b", Schema::boolean(), true, None).unwrap()
        .build()
}

fn kind(schema: &Schema, data: &[u8]) -> DecodeErrorKind {
    decode(schema, data).unwrap_err().into_kind()
}

#[test]
fn primitives() {
    let int = Schema::integer();
    for (data, value) in [
        (b"\x02\x01\x00".as_ref(), 0),
        (b"\x02\x01\x7f", 127),
        (b"\x02\x02\x00\x80", 128),
        (b"\x02\x01\x80", -128),
        (b"\x02\x02\xff\x7f", -129),
    ] {
        assert_eq!(decode(&int, data).unwrap(), Value::Int(value));
    }

    let boolean = Schema::boolean();
    assert_eq!(decode(&boolean, b"\x01\x01\x2a").unwrap(), Value::Bool(true));
    assert_eq!(decode(&boolean, b"\x01\x01\x00").unwrap(), Value::Bool(false));
    assert_eq!(
        kind(&boolean, b"\x01\x02\x00\x00"),
        DecodeErrorKind::InvalidLength { what: "boolean", found: 2 }
    );

    assert_eq!(
        kind(&Schema::null(), b"\x05\x01\x00"),
        DecodeErrorKind::UnexpectedContent { what: "null" }
    );
    assert_eq!(
        decode(
            &Schema::object_identifier(), b"\x06\x06\x2b\x06\x01\x04\x01\x01"
        ).unwrap(),
        Value::oid("1.3.6.1.4.1.1")
    );

    let enumerated = Schema::enumerated([("a", 0), ("b", 1)]);
    assert_eq!(decode(&enumerated, b"\x0a\x01\x01").unwrap(), Value::text("b"));
    assert_eq!(decode(&enumerated, b"\x0a\x01\x05").unwrap(), Value::Int(5));

    assert!(matches!(
        kind(&Schema::integer_in(Some(0), Some(10)), b"\x02\x01\x0b"),
        DecodeErrorKind::ConstraintViolation { value: 11, .. }
    ));
    assert!(matches!(
        kind(&int, b"\x01\x01\x00"),
        DecodeErrorKind::TagMismatch { found: Tag::BOOLEAN, .. }
    ));
}

#[test]
fn mandatory_and_optional() {
    let schema = pair();
    assert_eq!(
        decode(&schema, b"\x30\x03\x02\x01\x01").unwrap(),
        Value::record([("a", Value::Int(1))])
    );
    assert_eq!(
        decode(&schema, b"\x30\x06\x02\x01\x01\x01\x01\xff").unwrap(),
        Value::record([("a", Value::Int(1)), ("b", Value::Bool(true))])
    );
    assert_eq!(
        kind(&schema, b"\x30\x00"),
        DecodeErrorKind::MissingMandatoryField("a".into())
    );

    // A repeated field is skipped leniently and rejected strictly.
    let data = b"\x30\x06\x02\x01\x01\x02\x01\x02";
    assert_eq!(
        decode(&schema, data).unwrap(),
        Value::record([("a", Value::Int(1))])
    );
    assert_eq!(
        Mode::Strict.decode(&schema, data).unwrap_err().into_kind(),
        DecodeErrorKind::DuplicateField("a".into())
    );
    let data = b"\x30\x09\x02\x01\x01\x01\x01\xff\x02\x01\x07";
    assert_eq!(
        decode(&schema, data).unwrap(),
        Value::record([("a", Value::Int(1)), ("b", Value::Bool(true))])
    );

    // Out of order: `a` is skipped after `b` was decoded.
    assert_eq!(
        kind(&schema, b"\x30\x06\x01\x01\xff\x02\x01\x07"),
        DecodeErrorKind::MissingMandatoryField("a".into())
    );

    // Indefinite length.
    assert_eq!(
        decode(&schema, b"\x30\x80\x02\x01\x01\x00\x00").unwrap(),
        Value::record([("a", Value::Int(1))])
    );
}

#[test]
fn extension_after_any() {
    let schema = Schema::sequence()
        .add_field("id", Schema::integer(), false, None).unwrap()
        .add_field("payload", Schema::any(), true, None).unwrap()
        .build();
    let data = b"\x30\x08\x02\x01\x01\x04\x01\x78\x05\x00";
    let value = Value::record([
        ("id", Value::Int(1)), ("payload", Value::bytes(b"\x04\x01\x78"))
    ]);
    assert_eq!(decode(&schema, data).unwrap(), value);

    let recorder = Recorder::default();
    Codec::new().with_observer(&recorder).decode(&schema, data).unwrap();
    assert!(recorder.0.into_inner().contains(
        &format!("skipped '' {}", Tag::NULL)
    ));

    assert_eq!(
        Mode::Strict.decode(&schema, data).unwrap_err().into_kind(),
        DecodeErrorKind::DuplicateField("payload".into())
    );
}

#[test]
fn set_in_any_order() {
    let schema = Schema::set()
        .add_field("a", Schema::integer(), false, None).unwrap()
        .add_field("b", Schema::boolean(), false, None).unwrap()
        .build();
    let value = decode(&schema, b"\x31\x06\x01\x01\xff\x02\x01\x07").unwrap();
    assert_eq!(
        value,
        Value::record([("a", Value::Int(7)), ("b", Value::Bool(true))])
    );
    assert_eq!(
        kind(&schema, b"\x31\x06\x02\x01\x07\x02\x01\x08"),
        DecodeErrorKind::DuplicateField("a".into())
    );
}

#[test]
fn defaults() {
    let schema = Schema::sequence()
        .add_field("a", Schema::integer(), false, None).unwrap()
        .add_field(
            "c", Schema::integer().with_implicit_tag(Tag::ctx(0)),
            false, Some(Value::Int(3))
        ).unwrap()
        .build();
    assert_eq!(
        decode(&schema, b"\x30\x03\x02\x01\x01").unwrap(),
        Value::record([("a", Value::Int(1)), ("c", Value::Int(3))])
    );
    assert_eq!(
        decode(&schema, b"\x30\x06\x02\x01\x01\x80\x01\x09").unwrap(),
        Value::record([("a", Value::Int(1)), ("c", Value::Int(9))])
    );
}

#[test]
fn choice() {
    let schema = Schema::choice()
        .add_choice("x", Schema::integer()).unwrap()
        .add_choice("y", Schema::boolean()).unwrap()
        .build();
    let value = Value::choice("y", true);
    let data = encode(&schema, &value).unwrap();
    assert_eq!(data.as_ref(), b"\x01\x01\xff");
    assert_eq!(decode(&schema, &data).unwrap(), value);
    assert_eq!(
        kind(&schema, b"\x05\x00"),
        DecodeErrorKind::UnsupportedChoice(Tag::NULL)
    );

    let tagged = schema.with_explicit_tag(Tag::ctx(3));
    assert_eq!(
        decode(&tagged, b"\xa3\x03\x02\x01\x04").unwrap(),
        Value::choice("x", 4i64)
    );
    assert_eq!(
        kind(&tagged, b"\xa3\x02\x05\x00"),
        DecodeErrorKind::UnsupportedChoice(Tag::NULL)
    );
}

#[test]
fn explicit_and_implicit() {
    let explicit = Schema::integer().with_explicit_tag(Tag::ctx(0));
    let implicit = Schema::integer().with_implicit_tag(Tag::ctx(0));
    let value = Value::Int(5);

    let data = encode(&explicit, &value).unwrap();
    assert_eq!(data.as_ref(), b"\xa0\x03\x02\x01\x05");
    assert_eq!(decode(&explicit, &data).unwrap(), value);

    let data = encode(&implicit, &value).unwrap();
    assert_eq!(data.as_ref(), b"\x80\x01\x05");
    assert_eq!(decode(&implicit, &data).unwrap(), value);

    assert!(matches!(
        kind(&explicit, b"\xa0\x03\x01\x01\xff"),
        DecodeErrorKind::TagMismatch { found: Tag::BOOLEAN, .. }
    ));

    // Trailing data inside the explicit tag is tolerated leniently only.
    let data = b"\xa0\x05\x02\x01\x05\x05\x00";
    assert_eq!(decode(&explicit, data).unwrap(), value);
    assert_eq!(
        Mode::Strict.decode(&explicit, data).unwrap_err().into_kind(),
        DecodeErrorKind::TrailingData(2)
    );
}

#[test]
fn octet_strings() {
    let schema = Schema::octet_string();
    let hello = Value::bytes(b"hello");
    assert_eq!(
        decode(&schema, b"\x04\x05hello").unwrap(), hello
    );
    assert_eq!(
        decode(&schema, b"\x04\x80hello\x00\x00").unwrap(), hello
    );
    assert_eq!(
        decode(&schema, b"\x24\x09\x04\x02he\x04\x03llo").unwrap(), hello
    );
    assert_eq!(
        decode(&schema, b"\x24\x80\x04\x02he\x04\x03llo\x00\x00").unwrap(),
        hello
    );

    let visible = Schema::string(Flavor::Visible);
    assert_eq!(
        decode(&visible, b"\x1a\x02ok").unwrap(), Value::text("ok")
    );
    assert_eq!(
        kind(&visible, b"\x1a\x02o\n"),
        DecodeErrorKind::InvalidCharacter { flavor: Flavor::Visible }
    );
}

#[test]
fn octets_share_source() {
    let data = Bytes::from_static(b"\x04\x05hello");
    let value = Codec::new().decode_bytes(
        &Schema::octet_string(), data.clone()
    ).unwrap();
    let octets = value.as_bytes().unwrap();
    assert_eq!(octets.as_ref(), b"hello");
    assert_eq!(octets.as_ptr(), data[2..].as_ptr());
}

#[test]
fn any() {
    let schema = Schema::any();
    assert_eq!(
        decode(&schema, b"\x02\x01\x05").unwrap(),
        Value::bytes(b"\x02\x01\x05")
    );
    assert_eq!(
        decode(&schema, b"\x30\x80\x05\x00\x00\x00").unwrap(),
        Value::bytes(b"\x30\x02\x05\x00")
    );
    assert_eq!(
        decode(
            &schema.with_explicit_tag(Tag::ctx(0)), b"\xa0\x03\x02\x01\x05"
        ).unwrap(),
        Value::bytes(b"\x02\x01\x05")
    );
    assert_eq!(
        decode(&schema.with_implicit_tag(Tag::ctx(1)), b"\x81\x01\x05")
            .unwrap(),
        Value::bytes(b"\x81\x01\x05")
    );
}

#[test]
fn external() {
    let schema = Schema::external();
    let value = Value::record([
        ("direct-reference", Value::oid("2.1.1")),
        (
            "encoding",
            Value::choice("single-ASN1-type", Value::bytes(b"\x02\x01\x05"))
        ),
    ]);
    let data = encode(&schema, &value).unwrap();
    assert_eq!(
        data.as_ref(),
        b"\x28\x09\x06\x02\x51\x01\xa0\x03\x02\x01\x05"
    );
    assert_eq!(decode(&schema, &data).unwrap(), value);

    let value = Value::record([
        ("indirect-reference", Value::Int(3)),
        ("encoding", Value::choice("octet-aligned", Value::bytes(b"ab"))),
    ]);
    let data = encode(&schema, &value).unwrap();
    assert_eq!(data.as_ref(), b"\x28\x07\x02\x01\x03\x81\x02ab");
    assert_eq!(decode(&schema, &data).unwrap(), value);
}

#[test]
fn round_trip() {
    let body = Schema::choice()
        .add_choice("num", Schema::integer().with_implicit_tag(Tag::ctx(0)))
        .unwrap()
        .add_choice(
            "text",
            Schema::string(Flavor::Utf8).with_explicit_tag(Tag::ctx(1))
        ).unwrap()
        .build();
    let schema = Schema::sequence()
        .add_field("id", Schema::integer(), false, None).unwrap()
        .add_field(
            "flags",
            Schema::bit_string([("ack", 0), ("syn", 1), ("fin", 7)])
                .with_implicit_tag(Tag::ctx(1)),
            false, None
        ).unwrap()
        .add_field("name", Schema::string(Flavor::Visible), false, None)
        .unwrap()
        .add_field("oid", Schema::object_identifier(), true, None).unwrap()
        .add_field("tags", Schema::set_of(Schema::octet_string()), false, None)
        .unwrap()
        .add_field("body", body, false, None).unwrap()
        .add_field(
            "state", Schema::enumerated([("idle", 0), ("busy", 1)]),
            false, None
        ).unwrap()
        .add_field("nothing", Schema::null(), true, None).unwrap()
        .build();

    let value = Value::record([
        ("id", Value::Int(-300)),
        ("flags", Value::record([
            ("ack", Value::Bool(true)),
            ("syn", Value::Bool(false)),
            ("fin", Value::Bool(true)),
        ])),
        ("name", Value::text("sensor")),
        ("tags", Value::List(vec![
            Value::bytes(b"\x00\x01"), Value::bytes(b"")
        ])),
        ("body", Value::choice("text", "h\u{e9}llo")),
        ("state", Value::text("busy")),
        ("nothing", Value::Null),
    ]);
    let data = encode(&schema, &value).unwrap();
    assert_eq!(decode_all(&schema, &data).unwrap(), value);
    assert_eq!(
        Mode::Strict.decode(&schema, &data).unwrap(), value
    );
}

#[test]
fn lists() {
    let schema = Schema::sequence_of(Schema::integer());
    assert_eq!(
        decode(&schema, b"\x30\x06\x02\x01\x01\x02\x01\x02").unwrap(),
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
    assert_eq!(decode(&schema, b"\x30\x00").unwrap(), Value::List(vec![]));

    let err = decode(&schema, b"\x30\x06\x02\x01\x01\x01\x01\x00")
        .unwrap_err();
    assert_eq!(err.path().to_string(), "[1]");
    assert_eq!(
        err.into_kind(), DecodeErrorKind::UnexpectedElement(Tag::BOOLEAN)
    );
}

#[test]
fn error_path() {
    let inner = Schema::sequence()
        .add_field("flag", Schema::boolean(), false, None).unwrap()
        .build();
    let schema = Schema::sequence()
        .add_field("items", Schema::sequence_of(inner), false, None).unwrap()
        .build();
    let err = decode(
        &schema,
        b"\x30\x0d\x30\x0b\x30\x03\x01\x01\xff\x30\x04\x01\x02\x00\x00"
    ).unwrap_err();
    assert_eq!(err.path().to_string(), "items[1].flag");
    assert_eq!(err.to_string(), "items[1].flag: invalid boolean length 2");
}

#[test]
fn nesting_limit() {
    let schema = Schema::sequence_of(
        Schema::sequence_of(Schema::sequence_of(Schema::integer()))
    );
    let data = b"\x30\x04\x30\x02\x30\x00";
    assert_eq!(
        decode(&schema, data).unwrap(),
        Value::List(vec![Value::List(vec![Value::List(vec![])])])
    );
    let err = Codec::new().with_max_depth(2).decode(&schema, data)
        .unwrap_err();
    assert_eq!(err.path().to_string(), "[0][0]");
    assert_eq!(err.into_kind(), DecodeErrorKind::NestingTooDeep(2));
}

#[test]
fn trailing_data() {
    let schema = Schema::null();
    assert_eq!(decode(&schema, b"\x05\x00\x00").unwrap(), Value::Null);
    assert_eq!(
        decode_all(&schema, b"\x05\x00\x00").unwrap_err().into_kind(),
        DecodeErrorKind::TrailingData(1)
    );
}

#[test]
fn successive_values() {
    let schema = pair();
    let data = b"\x30\x03\x02\x01\x01\x30\x80\x02\x01\x02\x00\x00\x05";
    let (first, used) = decode_prefix(&schema, data).unwrap();
    assert_eq!(first, Value::record([("a", Value::Int(1))]));
    assert_eq!(used, 5);
    let (second, used) = decode_prefix(&schema, &data[5..]).unwrap();
    assert_eq!(second, Value::record([("a", Value::Int(2))]));
    assert_eq!(used, 7);
    assert_eq!(
        decode_prefix(&schema, &data[12..]).unwrap_err().into_kind(),
        DecodeErrorKind::LengthTruncated
    );
}

#[derive(Default)]
struct Recorder(RefCell<Vec<String>>);

impl Observer for Recorder {
    fn element(&self, path: &Path, tag: Tag, _len: usize) {
        self.0.borrow_mut().push(format!("element '{}' {}", path, tag));
    }

    fn skipped(&self, path: &Path, tag: Tag) {
        self.0.borrow_mut().push(format!("skipped '{}' {}", path, tag));
    }

    fn defaulted(&self, path: &Path, field: &str) {
        self.0.borrow_mut().push(format!("defaulted '{}' {}", path, field));
    }
}

#[test]
fn observer() {
    let inner = Schema::sequence()
        .add_field("a", Schema::integer(), false, None).unwrap()
        .add_field(
            "c", Schema::integer().with_implicit_tag(Tag::ctx(0)),
            false, Some(Value::Int(3))
        ).unwrap()
        .build();
    let schema = Schema::sequence()
        .add_field("inner", inner, false, None).unwrap()
        .build();
    let recorder = Recorder::default();
    let value = Codec::new().with_observer(&recorder).decode(
        &schema, b"\x30\x07\x30\x05\x02\x01\x01\x05\x00"
    ).unwrap();
    assert_eq!(
        value,
        Value::record([("inner", Value::record([
            ("a", Value::Int(1)), ("c", Value::Int(3))
        ]))])
    );
    assert_eq!(
        recorder.0.into_inner(),
        [
            format!("element '' {}", Tag::SEQUENCE),
            format!("element '' {}", Tag::SEQUENCE),
            format!("element 'inner' {}", Tag::INTEGER),
            format!("element 'inner' {}", Tag::NULL),
            format!("skipped 'inner' {}", Tag::NULL),
            String::from("defaulted 'inner' c"),
        ]
    );
}


//------------ Generated Values ----------------------------------------------

mod generated {
    use proptest::prelude::*;
    use proptest::collection::vec;
    use crate::{decode, encode};
    use crate::mode::Mode;
    use crate::schema::{Kind, Schema};
    use crate::string::Flavor;
    use crate::tag::Tag;
    use crate::value::Value;

    fn leaf() -> impl Strategy<Value = Schema> {
        prop::sample::select(vec![
            Schema::boolean(),
            Schema::integer(),
            Schema::enumerated([("idle", 0), ("busy", 1), ("gone", -5)]),
            Schema::bit_string([("a", 0), ("b", 3), ("c", 7)]),
            Schema::octet_string(),
            Schema::string(Flavor::Visible),
            Schema::string(Flavor::Numeric),
            Schema::string(Flavor::Utf8),
            Schema::null(),
            Schema::object_identifier(),
        ])
    }

    /// Builds a sequence or set with a distinct context tag per field.
    fn fields(fields: Vec<(Schema, bool)>, set: bool) -> Schema {
        let mut res = if set { Schema::set() } else { Schema::sequence() };
        for (i, (schema, optional)) in fields.into_iter().enumerate() {
            res = res.add_field(
                format!("f{}", i),
                schema.with_implicit_tag(Tag::ctx(i as u32)),
                optional, None
            ).unwrap();
        }
        res.build()
    }

    fn choice(alternatives: Vec<Schema>) -> Schema {
        let mut res = Schema::choice();
        for (i, schema) in alternatives.into_iter().enumerate() {
            res = res.add_choice(
                format!("c{}", i), schema.with_implicit_tag(Tag::ctx(i as u32))
            ).unwrap();
        }
        res.build()
    }

    fn schema() -> impl Strategy<Value = Schema> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                vec((inner.clone(), any::<bool>()), 0..4).prop_map(|items| {
                    fields(items, false)
                }),
                vec((inner.clone(), any::<bool>()), 0..4).prop_map(|items| {
                    fields(items, true)
                }),
                inner.clone().prop_map(Schema::sequence_of),
                inner.clone().prop_map(Schema::set_of),
                vec(inner.clone(), 1..4).prop_map(choice),
                (inner, 0u32..40).prop_map(|(schema, number)| {
                    schema.with_explicit_tag(Tag::application(number))
                }),
            ]
        })
    }

    /// Returns a strategy for values that fit the schema.
    fn value_of(schema: &Schema) -> BoxedStrategy<Value> {
        match schema.kind() {
            Kind::Boolean => any::<bool>().prop_map(Value::Bool).boxed(),
            Kind::Integer { .. } => any::<i64>().prop_map(Value::Int).boxed(),
            Kind::Enumerated { values } => {
                let names: Vec<_> = values.iter().map(|(name, _)| {
                    Value::text(name)
                }).collect();
                prop::sample::select(names).boxed()
            }
            Kind::BitString { positions } => {
                // The highest bit is always set so that all named bits
                // are part of the encoding.
                let names: Vec<_> = positions.iter().map(|(name, pos)| {
                    (name.to_string(), pos)
                }).collect();
                let top = names.iter().map(|item| item.1).max();
                vec(any::<bool>(), names.len()).prop_map(move |bits| {
                    Value::record(names.iter().zip(bits).map(|(item, bit)| {
                        let bit = bit || Some(item.1) == top;
                        (item.0.clone(), Value::Bool(bit))
                    }))
                }).boxed()
            }
            Kind::OctetString { flavor: Flavor::Generic, .. } => {
                vec(any::<u8>(), 0..16).prop_map(|octets| {
                    Value::Bytes(octets.into())
                }).boxed()
            }
            Kind::OctetString { flavor: Flavor::Utf8, .. } => {
                any::<String>().prop_map(Value::Text).boxed()
            }
            Kind::OctetString { flavor: Flavor::Visible, .. } => {
                "[ -~]{0,16}".prop_map(Value::Text).boxed()
            }
            Kind::OctetString { .. } => {
                "[0-9 ]{0,16}".prop_map(Value::Text).boxed()
            }
            Kind::Null => Just(Value::Null).boxed(),
            Kind::ObjectIdentifier => {
                (0u32..3, 0u32..40, vec(any::<u32>(), 0..4)).prop_map(
                    |(first, second, rest)| {
                        let mut res = format!("{}.{}", first, second);
                        for item in rest {
                            res.push_str(&format!(".{}", item));
                        }
                        Value::ObjectId(res)
                    }
                ).boxed()
            }
            Kind::Sequence { fields } | Kind::Set { fields } => {
                let fields: Vec<_> = fields.iter().map(|field| {
                    let name = field.name().to_string();
                    let value = value_of(field.schema());
                    if field.is_optional() {
                        prop::option::of(value).prop_map(move |value| {
                            value.map(|value| (name.clone(), value))
                        }).boxed()
                    }
                    else {
                        value.prop_map(move |value| {
                            Some((name.clone(), value))
                        }).boxed()
                    }
                }).collect();
                fields.prop_map(|fields| {
                    Value::record(fields.into_iter().flatten())
                }).boxed()
            }
            Kind::SequenceOf { element } | Kind::SetOf { element } => {
                vec(value_of(element), 0..3).prop_map(Value::List).boxed()
            }
            Kind::Choice { alternatives } => {
                let options: Vec<_> = alternatives.iter().map(|item| {
                    let name = item.name().to_string();
                    value_of(item.schema()).prop_map(move |value| {
                        Value::choice(name.clone(), value)
                    }).boxed()
                }).collect();
                prop::strategy::Union::new(options).boxed()
            }
            kind => unreachable!("no values generated for {}", kind),
        }
    }

    fn typed_value() -> impl Strategy<Value = (Schema, Value)> {
        schema().prop_flat_map(|schema| {
            let value = value_of(&schema);
            (Just(schema), value)
        })
    }

    proptest! {
        #[test]
        fn values_survive_round_trip((schema, value) in typed_value()) {
            let data = encode(&schema, &value).unwrap();
            prop_assert_eq!(&decode(&schema, &data).unwrap(), &value);
            prop_assert_eq!(
                &Mode::Strict.decode(&schema, &data).unwrap(), &value
            );
        }
    }

    #[test]
    fn schemas_and_values_are_shareable() {
        fn is_send_sync<T: Send + Sync>() { }
        is_send_sync::<Schema>();
        is_send_sync::<Value>();
    }
}
