//! Encoding data in BER.
//!
//! Encoding is driven by the schema. Each value is encoded into its content
//! octets according to the kind of its schema. The content is then preceded
//! by the identifier octets of the schema’s implicit or natural tag and the
//! length octets. Finally, the result is wrapped into one constructed value
//! for each explicit tag, innermost first.
//!
//! The encoder always produces definite length values in the shortest
//! possible form.
//!
//! Errors are reported as an [`EncodeError`] which combines the reason for
//! the failure with the path to the value that could not be encoded.

pub use self::error::{EncodeError, EncodeErrorKind};

mod error;

use log::trace;
use crate::{int, oid};
use crate::int::{Bounds, Enumeration};
use crate::length::Length;
use crate::schema::{Alternative, Field, Kind, Schema};
use crate::string::{bit, octet};
use crate::tag::{Form, Tag};
use crate::value::Value;


//------------ encode_value --------------------------------------------------

/// Appends the encoding of a value to the target.
pub(crate) fn encode_value(
    schema: &Schema, value: &Value, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    trace!("encoding {} as {}", value.kind_name(), schema);
    let mut content = Vec::new();
    match schema.kind() {
        Kind::Choice { alternatives } => {
            return encode_choice(schema, alternatives, value, target)
        }
        Kind::Any => {
            let bytes = match value {
                Value::Bytes(bytes) => bytes,
                value => return Err(mismatch("Bytes", value).into())
            };
            append_wrapped(schema.explicit_tags(), bytes, target);
            return Ok(())
        }
        Kind::Boolean => {
            match value {
                Value::Bool(value) => {
                    content.push(if *value { 0xFF } else { 0x00 })
                }
                value => return Err(mismatch("Bool", value).into())
            }
        }
        Kind::Integer { range } => encode_integer(*range, value, &mut content)?,
        Kind::Enumerated { values } => {
            encode_enumerated(values, value, &mut content)?
        }
        Kind::Real => {
            match value {
                Value::Bytes(bytes) => content.extend_from_slice(bytes),
                _ => {
                    return Err(
                        EncodeErrorKind::NotImplemented("REAL encoding").into()
                    )
                }
            }
        }
        Kind::BitString { positions } => {
            bit::append_content(positions, value, &mut content)?
        }
        Kind::OctetString { flavor, size } => {
            octet::append_content(*flavor, *size, value, &mut content)?
        }
        Kind::Null => { }
        Kind::ObjectIdentifier => {
            match value {
                Value::ObjectId(id) => oid::append_content(id, &mut content)?,
                value => return Err(mismatch("ObjectId", value).into())
            }
        }
        Kind::Sequence { fields } | Kind::Set { fields }
        | Kind::External { fields } => {
            encode_fields(fields, value, &mut content)?
        }
        Kind::SequenceOf { element } | Kind::SetOf { element } => {
            encode_list(element, value, &mut content)?
        }
    }

    let mut inner = Vec::with_capacity(content.len() + 8);
    append_tlv(
        schema.identifier_tag().with_form(schema.kind().form()),
        &content, &mut inner
    );
    append_wrapped(schema.explicit_tags(), &inner, target);
    Ok(())
}

fn encode_integer(
    range: Bounds, value: &Value, target: &mut Vec<u8>
) -> Result<(), EncodeErrorKind> {
    let value = match value {
        Value::Int(value) => *value,
        value => return Err(mismatch("Int", value))
    };
    if !range.contains(value) {
        return Err(EncodeErrorKind::ConstraintViolation {
            value, bounds: range
        })
    }
    int::append_content(value, target);
    Ok(())
}

/// Encodes an enumerated value given either by item name or number.
fn encode_enumerated(
    values: &Enumeration, value: &Value, target: &mut Vec<u8>
) -> Result<(), EncodeErrorKind> {
    let number = match value {
        Value::Text(name) => {
            values.number(name).ok_or_else(|| {
                EncodeErrorKind::UnknownEnumeration(name.clone())
            })?
        }
        Value::Int(number) => *number,
        value => return Err(mismatch("Text or Int", value))
    };
    int::append_content(number, target);
    Ok(())
}

/// Encodes the content of a sequence, set, or external.
///
/// Fields are encoded in the order of the schema. Every field present in
/// the record is encoded, even if its value equals the default.
fn encode_fields(
    fields: &[Field], value: &Value, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    let record = match value {
        Value::Record(record) => record,
        value => return Err(mismatch("Record", value).into())
    };
    if let Some(name) = record.names().find(|name| {
        !fields.iter().any(|field| field.name() == *name)
    }) {
        return Err(EncodeErrorKind::UnknownField(name.into()).into())
    }
    for field in fields {
        match record.get(field.name()) {
            Some(value) => {
                encode_value(field.schema(), value, target).map_err(|err| {
                    err.within(field.name())
                })?
            }
            None => {
                if !field.is_optional() {
                    return Err(EncodeErrorKind::MissingMandatoryField(
                        field.name().into()
                    ).into())
                }
            }
        }
    }
    Ok(())
}

fn encode_list(
    element: &Schema, value: &Value, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    let items = match value {
        Value::List(items) => items,
        value => return Err(mismatch("List", value).into())
    };
    for (index, item) in items.iter().enumerate() {
        encode_value(element, item, target).map_err(|err| err.within(index))?;
    }
    Ok(())
}

/// Encodes the selected alternative of a choice.
///
/// The alternative brings its own tags. Only the explicit tags of the
/// choice itself are added.
fn encode_choice(
    schema: &Schema,
    alternatives: &[Alternative],
    value: &Value,
    target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    let (name, inner) = match value {
        Value::Choice(name, inner) => (name, inner),
        value => return Err(mismatch("Choice", value).into())
    };
    let alternative = match alternatives.iter().find(|item| {
        item.name() == name
    }) {
        Some(alternative) => alternative,
        None => {
            return Err(EncodeErrorKind::UnknownChoice(name.clone()).into())
        }
    };
    let mut content = Vec::new();
    encode_value(alternative.schema(), inner, &mut content).map_err(|err| {
        err.within(name.as_str())
    })?;
    append_wrapped(schema.explicit_tags(), &content, target);
    Ok(())
}


//------------ Helper Functions ----------------------------------------------

/// Appends a complete value with definite length.
fn append_tlv(tag: Tag, content: &[u8], target: &mut Vec<u8>) {
    tag.append_encoded(None, target);
    Length::Definite(content.len()).append_encoded(target);
    target.extend_from_slice(content);
}

/// Appends a value wrapped in explicit tags, outermost tag first.
fn append_wrapped(tags: &[Tag], inner: &[u8], target: &mut Vec<u8>) {
    match tags.split_first() {
        None => target.extend_from_slice(inner),
        Some((outer, rest)) => {
            let mut content = Vec::with_capacity(inner.len() + 8);
            append_wrapped(rest, inner, &mut content);
            outer.append_encoded(Some(Form::Constructed), target);
            Length::Definite(content.len()).append_encoded(target);
            target.extend_from_slice(&content);
        }
    }
}

fn mismatch(expected: &'static str, value: &Value) -> EncodeErrorKind {
    EncodeErrorKind::TypeMismatch { expected, found: value.kind_name() }
}


//============ Tests =========================================================
